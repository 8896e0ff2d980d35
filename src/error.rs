//! Error codes

/// Errors that can occur when using this library
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// A required attribute in a directory entry was missing.
	#[error("Missing attribute `{0}`")]
	Missing(String),
	/// The contents of a value or configuration did not conform to the
	/// expected syntax.
	#[error("Malformed data: {0}")]
	Invalid(String),
	/// The HTTP request to the directory API failed or returned an error
	/// status.
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	/// A profile document was not well-formed XML.
	#[error(transparent)]
	Xml(#[from] quick_xml::DeError),
	/// A report list was not well-formed JSON.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	/// An underlying protocol error or similar occurred, or the LDAP library
	/// was used incorrectly.
	#[error(transparent)]
	Ldap(#[from] ldap3::LdapError),
	/// Reading a certificate or configuration file failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// A configuration document could not be deserialized.
	#[error(transparent)]
	Config(#[from] toml::de::Error),
}

/// Result type with the crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
