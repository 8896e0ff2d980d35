//! Config for the directory client.
use std::{
	num::NonZeroUsize,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use ldap3::LdapConnSettings;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Base of the production Bluepages HTTP API.
pub const BLUEPAGES_API_URL: &str = "https://bluepages.ibm.com/BpHttpApisv3/slaphapi?ibmperson";
/// Base of the production unified profile photo service.
pub const BLUEPAGES_PHOTO_URL: &str =
	"https://w3-services1.w3-969.ibm.com/myw3/unified-profile-photo/v1/image";
/// The production Bluepages LDAPS interface.
pub const BLUEPAGES_LDAP_URL: &str = "ldaps://bluepages.ibm.com:636";
/// Search base under which people are looked up after a successful bind.
pub const BLUEPAGES_SEARCH_BASE: &str = "ou=bluepages,o=ibm.com";

/// Directory client configuration.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
	/// Base URL of the HTTP directory API. Lookups are appended verbatim,
	/// e.g. `<api_url>/mail=<identifier>.list/byxml`.
	pub api_url: Url,
	/// Base URL of the photo service.
	pub photo_url: Url,
	/// HTTP client settings.
	#[serde(default)]
	pub http: HttpConfig,
	/// LDAPS interface used for authentication.
	pub ldap: LdapConfig,
	/// Limits for the reporting hierarchy walk.
	#[serde(default)]
	pub walk: WalkConfig,
}

impl Config {
	/// Configuration pointing at the production Bluepages endpoints.
	pub fn bluepages() -> Result<Self, Error> {
		Ok(Config {
			api_url: parse_url(BLUEPAGES_API_URL)?,
			photo_url: parse_url(BLUEPAGES_PHOTO_URL)?,
			http: HttpConfig::default(),
			ldap: LdapConfig {
				url: parse_url(BLUEPAGES_LDAP_URL)?,
				search_base: BLUEPAGES_SEARCH_BASE.to_owned(),
				time_limit: default_time_limit(),
				connection: ConnectionConfig::default(),
			},
			walk: WalkConfig::default(),
		})
	}

	/// Parse a configuration from a TOML document.
	pub fn from_toml(document: &str) -> Result<Self, Error> {
		Ok(toml::from_str(document)?)
	}

	/// Read and parse a TOML configuration file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
		let document = tokio::fs::read_to_string(path).await?;
		Self::from_toml(&document)
	}
}

/// Parse one of the built-in URLs.
fn parse_url(url: &str) -> Result<Url, Error> {
	Url::parse(url).map_err(|err| Error::Invalid(format!("{url}: {err}")))
}

/// Settings for the HTTP client talking to the directory API
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
	/// Total timeout of a single request.
	pub timeout: Duration,
	/// Timeout to establish a connection.
	pub connect_timeout: Duration,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self { timeout: Duration::from_secs(30), connect_timeout: Duration::from_secs(10) }
	}
}

/// LDAP configuration used by the authentication gate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LdapConfig {
	/// The URL to connect to the server with. Supports ldap, ldaps, and ldapi
	/// schemes
	pub url: Url,
	/// The search base used to confirm a bound user, e.g.
	/// `ou=bluepages,o=ibm.com`
	pub search_base: String,
	/// Server-side time limit of the confirming search, in seconds.
	#[serde(default = "default_time_limit")]
	pub time_limit: i32,
	/// Connection settings.
	#[serde(default)]
	pub connection: ConnectionConfig,
}

/// Time limit used by the production directory.
fn default_time_limit() -> i32 {
	500
}

/// Configuration for how to connect to the LDAP server
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
	/// Timeout to establish a connection in seconds.
	pub timeout: u64,

	/// LDAP operation timeout.
	pub operation_timeout: Duration,

	/// TLS config
	pub tls: TlsConfig,
}

impl Default for ConnectionConfig {
	fn default() -> Self {
		Self { timeout: 5, operation_timeout: Duration::from_secs(10), tls: TlsConfig::default() }
	}
}

/// TLS Configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
	/// Use StartTLS extended operation for establishing a secure connection,
	/// rather than TLS on a dedicated port.
	pub starttls: bool,

	/// Disable verification of TLS certificates
	pub no_tls_verify: bool,

	/// PEM file with the root certificates to trust instead of the defaults
	pub root_certificates_path: Option<PathBuf>,
}

impl ConnectionConfig {
	/// Create a [`LdapConnSettings`] based on this [`ConnectionConfig`]
	pub(crate) async fn to_settings(&self) -> Result<LdapConnSettings, Error> {
		let mut settings = LdapConnSettings::new();

		settings = settings.set_conn_timeout(Duration::from_secs(self.timeout));
		settings = settings.set_starttls(self.tls.starttls);
		settings = settings.set_no_tls_verify(self.tls.no_tls_verify);

		if let Some(path) = &self.tls.root_certificates_path {
			let pem = tokio::fs::read(path).await?;
			let certificates = rustls_pemfile::certs(&mut pem.as_slice())?;
			if certificates.is_empty() {
				return Err(Error::Invalid(format!(
					"No certificates found in {}",
					path.display()
				)));
			}

			let mut roots = rustls::RootCertStore::empty();
			for certificate in certificates {
				roots
					.add(&rustls::Certificate(certificate))
					.map_err(|_| Error::Invalid("Could not read root certificate".to_owned()))?;
			}

			let tls = rustls::ClientConfig::builder()
				.with_safe_defaults()
				.with_root_certificates(roots)
				.with_no_client_auth();
			settings = settings.set_config(Arc::new(tls));
		}
		Ok(settings)
	}
}

/// Limits applied while walking the reporting hierarchy. The defaults walk
/// the whole tree with unbounded parallelism and no cycle detection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
	/// Maximum number of report list requests in flight at once.
	pub max_concurrency: Option<NonZeroUsize>,
	/// Maximum number of levels below the starting manager to expand. `1`
	/// returns only the direct reports.
	pub max_depth: Option<NonZeroUsize>,
	/// Skip reports whose DN already appears among their own ancestors.
	pub detect_cycles: bool,
}
