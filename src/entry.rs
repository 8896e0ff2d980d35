//! Helper methods for extracting data from directory entries.
use ldap3::SearchEntry;
use serde::Deserialize;

use crate::error::Error;

/// Placeholder returned for attributes a directory entry does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

/// An extension trait for anything holding directory attributes that provides
/// convenience methods for extracting data.
pub trait AttributeSource {
	/// Get the first value of an attribute.
	fn attr_first(&self, attr: &str) -> Option<&str>;

	/// Get the first value of an attribute, or [`NOT_AVAILABLE`] when the
	/// attribute is absent. Absence is data, never an error.
	fn attr_value(&self, attr: &str) -> &str {
		self.attr_first(attr).unwrap_or(NOT_AVAILABLE)
	}
}

impl AttributeSource for SearchEntry {
	fn attr_first(&self, attr: &str) -> Option<&str> {
		let attr = self.attrs.get(attr)?;
		attr.first().map(String::as_str)
	}
}

/// A parsed `byxml` profile response.
///
/// ```xml
/// <directory-entries>
///   <entry dn="uid=000000631,c=cr,ou=bluepages,o=ibm.com">
///     <attr name="givenname"><value>Andres</value></attr>
///   </entry>
///   <return-code>0</return-code>
///   <count>1</count>
/// </directory-entries>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileDocument {
	/// Matching entries; zero when the identifier is unknown.
	#[serde(rename = "entry", default)]
	pub entries: Vec<ProfileEntry>,
}

/// A single `entry` node of a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileEntry {
	/// Distinguished name of the entry.
	#[serde(rename = "@dn")]
	pub dn: String,
	/// Attributes in document order.
	#[serde(rename = "attr", default)]
	pub attrs: Vec<XmlAttribute>,
}

/// An `attr` node with its `value` children.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct XmlAttribute {
	/// Attribute name.
	#[serde(rename = "@name")]
	pub name: String,
	/// Attribute values in document order.
	#[serde(rename = "value", default)]
	pub values: Vec<String>,
}

impl ProfileDocument {
	/// Parse a profile response body.
	pub fn parse(xml: &str) -> Result<Self, Error> {
		Ok(quick_xml::de::from_str(xml)?)
	}

	/// The DN of the first entry, `None` if the document holds no entry.
	#[must_use]
	pub fn dn(&self) -> Option<&str> {
		self.entries.first().map(|entry| entry.dn.as_str())
	}
}

impl AttributeSource for ProfileDocument {
	fn attr_first(&self, attr: &str) -> Option<&str> {
		self.entries
			.iter()
			.flat_map(|entry| &entry.attrs)
			.find(|candidate| candidate.name == attr)?
			.values
			.first()
			.map(String::as_str)
	}
}
