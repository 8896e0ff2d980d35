//! The public entry point composing the directory lookups.

use futures::future::try_join_all;
use tracing::debug;
use url::Url;

use crate::{
	config::{Config, WalkConfig},
	employee::{self, EmployeeInfo, EmployeeLocation},
	entry::{AttributeSource, ProfileDocument},
	error::Error,
	hierarchy::{HierarchyWalker, ReportRecord},
	http::{Directory, HttpDirectory},
	ldap::{self, CredentialVerifier, LdapVerifier},
	normalize::objectise,
};

/// Client for the employee directory.
///
/// Every call fetches fresh data; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Bluepages<D = HttpDirectory, V = LdapVerifier> {
	/// Profile and report list lookups.
	directory: D,
	/// Credential checks.
	verifier: V,
	/// Base of the photo service.
	photo_url: Url,
	/// Limits of hierarchy walks.
	walk: WalkConfig,
}

impl Bluepages {
	/// Create a client talking to the HTTP API and LDAP server of `config`.
	pub fn new(config: Config) -> Result<Self, Error> {
		let directory = HttpDirectory::new(config.api_url, &config.http)?;
		let verifier = LdapVerifier::new(config.ldap);
		Ok(Self::with_parts(directory, verifier, config.photo_url, config.walk))
	}
}

impl<D: Directory, V: CredentialVerifier> Bluepages<D, V> {
	/// Assemble a client from its parts.
	#[must_use]
	pub fn with_parts(directory: D, verifier: V, photo_url: Url, walk: WalkConfig) -> Self {
		Self { directory, verifier, photo_url, walk }
	}

	/// The underlying directory.
	#[must_use]
	pub fn directory(&self) -> &D {
		&self.directory
	}

	/// Raw profile of `identifier`.
	pub async fn profile(&self, identifier: &str) -> Result<ProfileDocument, Error> {
		self.directory.profile(identifier).await
	}

	/// DN of `identifier`, `None` if the directory does not know it.
	pub async fn resolve_dn(&self, identifier: &str) -> Result<Option<String>, Error> {
		self.directory.resolve_dn(identifier).await
	}

	/// Whether the directory knows `identifier`.
	pub async fn employee_exists(&self, identifier: &str) -> Result<bool, Error> {
		Ok(self.resolve_dn(identifier).await?.is_some())
	}

	/// Given name and surname.
	pub async fn name(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::name(&self.profile(identifier).await?))
	}

	/// Lower cased primary user id, e.g. `aromeroh`.
	pub async fn primary_user_id(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::primary_user_id(&self.profile(identifier).await?))
	}

	/// Directory uid.
	pub async fn uid(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::uid(&self.profile(identifier).await?))
	}

	/// Uid of the employee's manager.
	pub async fn manager_uid(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::manager_uid(&self.profile(identifier).await?))
	}

	/// Building, country and work location.
	pub async fn location(&self, identifier: &str) -> Result<EmployeeLocation, Error> {
		Ok(employee::location(&self.profile(identifier).await?))
	}

	/// Office phone number.
	pub async fn phone_number(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::phone_number(&self.profile(identifier).await?))
	}

	/// Job responsibilities.
	pub async fn job_function(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::job_function(&self.profile(identifier).await?))
	}

	/// Mobile phone number.
	pub async fn mobile(&self, identifier: &str) -> Result<String, Error> {
		Ok(employee::mobile(&self.profile(identifier).await?))
	}

	/// Whether the employee is a manager.
	pub async fn is_manager(&self, identifier: &str) -> Result<bool, Error> {
		Ok(employee::is_manager(&self.profile(identifier).await?))
	}

	/// Photo URL of `identifier`. No request is made.
	#[must_use]
	pub fn photo_url(&self, identifier: &str) -> String {
		employee::photo_url(&self.photo_url, identifier)
	}

	/// Listing summary of the employee.
	pub async fn employee_info(&self, identifier: &str) -> Result<EmployeeInfo, Error> {
		let profile = self.profile(identifier).await?;
		Ok(employee::employee_info(&profile, &self.photo_url, identifier))
	}

	/// Check `secret` for `identifier`. Any failure, including an unknown
	/// identifier or an unreachable server, is `false`.
	pub async fn authenticate(&self, identifier: &str, secret: &str) -> bool {
		ldap::authenticate(&self.directory, &self.verifier, identifier, secret).await
	}

	/// A walker over the reporting hierarchy using the configured limits.
	#[must_use]
	pub fn walker(&self) -> HierarchyWalker<'_, D> {
		HierarchyWalker::new(&self.directory, self.walk.clone())
	}

	/// People reporting directly to `identifier`. Empty if the identifier is
	/// unknown.
	pub async fn direct_reports(&self, identifier: &str) -> Result<Vec<ReportRecord>, Error> {
		match self.resolve_dn(identifier).await? {
			Some(dn) => Ok(self.walker().direct_reports(&dn).await),
			None => Ok(Vec::new()),
		}
	}

	/// Everyone below `identifier` in the hierarchy. Empty if the identifier
	/// is unknown.
	pub async fn all_reports(&self, identifier: &str) -> Result<Vec<ReportRecord>, Error> {
		match self.resolve_dn(identifier).await? {
			Some(dn) => Ok(self.walker().all_reports(&dn).await),
			None => Ok(Vec::new()),
		}
	}

	/// Listing summaries of the people reporting directly to `identifier`,
	/// in directory order.
	pub async fn manager_in_country_employees(
		&self,
		identifier: &str,
	) -> Result<Vec<EmployeeInfo>, Error> {
		let Some(dn) = self.resolve_dn(identifier).await? else {
			debug!(identifier, "Unknown manager");
			return Ok(Vec::new());
		};
		let mails: Vec<String> = objectise(self.directory.reports(&dn, &["mail"]).await?)
			.iter()
			.filter_map(|bag| bag.attr_first("mail").map(str::to_owned))
			.collect();

		try_join_all(mails.iter().map(|mail| self.employee_info(mail))).await
	}
}
