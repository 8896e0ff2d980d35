//! Named projections over a fetched profile.
use serde::{Deserialize, Serialize};
use url::Url;

use crate::entry::AttributeSource;

/// Where an employee sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeLocation {
	/// Building name.
	pub building_name: String,
	/// Country name.
	pub country: String,
	/// Two letter country code.
	pub country_alpha_code: String,
	/// Work location code.
	pub work_location: String,
	/// Numeric country code of the employee's serial number.
	pub employee_country_code: String,
}

/// Summary of an employee as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
	/// Full name.
	pub name: String,
	/// Email address.
	pub email: String,
	/// Photo URL.
	pub photo: String,
	/// Job responsibilities.
	pub job_function: String,
	/// Office phone number.
	pub telephone_number: String,
	/// Building name.
	pub building_name: String,
}

/// Given name and surname joined by a space.
pub fn name(profile: &impl AttributeSource) -> String {
	format!("{} {}", profile.attr_value("givenname"), profile.attr_value("sn"))
}

/// Primary user id, always lower case.
pub fn primary_user_id(profile: &impl AttributeSource) -> String {
	profile.attr_value("primaryuserid").to_lowercase()
}

/// Directory uid (serial number followed by country code).
pub fn uid(profile: &impl AttributeSource) -> String {
	profile.attr_value("uid").to_owned()
}

/// Uid of the manager: the manager's serial number concatenated with the
/// manager's country code.
pub fn manager_uid(profile: &impl AttributeSource) -> String {
	format!(
		"{}{}",
		profile.attr_value("managerserialnumber"),
		profile.attr_value("managercountrycode")
	)
}

/// Location bundle of the employee.
pub fn location(profile: &impl AttributeSource) -> EmployeeLocation {
	EmployeeLocation {
		building_name: profile.attr_value("buildingname").to_owned(),
		country: profile.attr_value("co").to_owned(),
		country_alpha_code: profile.attr_value("c").to_owned(),
		work_location: profile.attr_value("workloc").to_owned(),
		employee_country_code: profile.attr_value("employeecountrycode").to_owned(),
	}
}

/// Office phone number.
pub fn phone_number(profile: &impl AttributeSource) -> String {
	profile.attr_value("telephonenumber").to_owned()
}

/// Job responsibilities.
pub fn job_function(profile: &impl AttributeSource) -> String {
	profile.attr_value("jobresponsibilities").to_owned()
}

/// Mobile phone number.
pub fn mobile(profile: &impl AttributeSource) -> String {
	profile.attr_value("mobile").to_owned()
}

/// Whether the directory flags the employee as a manager (`Y`).
pub fn is_manager(profile: &impl AttributeSource) -> bool {
	profile.attr_value("ismanager") == "Y"
}

/// Photo of `identifier`: `<photo_url>/<identifier>?def=avatar`. The
/// identifier is inserted as is, without escaping.
#[must_use]
pub fn photo_url(photo_base: &Url, identifier: &str) -> String {
	format!("{}/{identifier}?def=avatar", photo_base.as_str().trim_end_matches('/'))
}

/// The listing summary of the employee.
pub fn employee_info(
	profile: &impl AttributeSource,
	photo_base: &Url,
	identifier: &str,
) -> EmployeeInfo {
	EmployeeInfo {
		name: name(profile),
		email: profile.attr_value("mail").to_owned(),
		photo: photo_url(photo_base, identifier),
		job_function: job_function(profile),
		telephone_number: phone_number(profile),
		building_name: profile.attr_value("buildingname").to_owned(),
	}
}
