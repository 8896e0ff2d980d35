//! Credential checks against the LDAPS interface of the directory.

use async_trait::async_trait;
use ldap3::{LdapConnAsync, LdapError, Scope, SearchEntry, SearchOptions};
use tracing::{debug, warn};

use crate::{config::LdapConfig, error::Error, http::Directory};

/// Result code of a bind rejected because of a wrong DN or password.
const INVALID_CREDENTIALS: u32 = 49;

/// Checks a secret for an already resolved directory entry.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
	/// Bind as `dn` using `secret`, then confirm that the entry with `uid` is
	/// visible to the bound session. Every failure is `false`.
	async fn verify(&self, dn: &str, uid: &str, secret: &str) -> bool;
}

/// [`CredentialVerifier`] that opens a fresh LDAP session per check.
#[derive(Debug, Clone)]
pub struct LdapVerifier {
	/// Server, search base and connection settings.
	config: LdapConfig,
}

impl LdapVerifier {
	/// Create a verifier for the configured server.
	#[must_use]
	pub fn new(config: LdapConfig) -> Self {
		Self { config }
	}

	/// Create a connection to an ldap server based on the settings and url
	/// specified in the configuration.
	async fn connect(&self) -> Result<(LdapConnAsync, ldap3::Ldap), Error> {
		let settings = self.config.connection.to_settings().await?;
		let (conn, ldap) = LdapConnAsync::from_url_with_settings(settings, &self.config.url).await?;
		Ok((conn, ldap))
	}

	/// Bind, then look for the user under the search base.
	async fn bind_and_search(
		&self,
		ldap: &mut ldap3::Ldap,
		dn: &str,
		uid: &str,
		secret: &str,
	) -> Result<bool, Error> {
		let timeout = self.config.connection.operation_timeout;
		ldap.with_timeout(timeout).simple_bind(dn, secret).await?.success()?;

		let filter = format!("(uid={})", ldap3::ldap_escape(uid));
		let (entries, _result) = ldap
			.with_search_options(SearchOptions::new().timelimit(self.config.time_limit))
			.with_timeout(timeout)
			.search(&self.config.search_base, Scope::Subtree, &filter, vec!["*"])
			.await?
			.success()?;

		Ok(entries
			.into_iter()
			.next()
			.map(SearchEntry::construct)
			.is_some_and(|entry| !entry.attrs.is_empty() || !entry.bin_attrs.is_empty()))
	}
}

#[async_trait]
impl CredentialVerifier for LdapVerifier {
	async fn verify(&self, dn: &str, uid: &str, secret: &str) -> bool {
		let (conn, mut ldap) = match self.connect().await {
			Ok(connection) => connection,
			Err(err) => {
				warn!(url = %self.config.url, "Connecting to LDAP failed: {err}");
				return false;
			}
		};
		let conn = tokio::spawn(async move {
			if let Err(err) = conn.drive().await {
				warn!("Ldap connection error {err}");
			}
		});

		let verified = self.bind_and_search(&mut ldap, dn, uid, secret).await;

		// The session is released on every path, including a rejected bind.
		if let Err(err) = ldap.unbind().await {
			warn!("Unbinding from LDAP failed: {err}");
		}
		if let Err(err) = conn.await {
			warn!("Failed to join background task: {err}");
		}

		match verified {
			Ok(found) => {
				debug!(dn, found, "Credentials accepted");
				found
			}
			Err(Error::Ldap(LdapError::LdapResult { result }))
				if result.rc == INVALID_CREDENTIALS =>
			{
				debug!(dn, "Credentials rejected");
				false
			}
			Err(err) => {
				warn!(dn, "Verifying credentials failed: {err}");
				false
			}
		}
	}
}

/// The value of the leading RDN of `dn`, e.g. `000001631` for
/// `uid=000001631,c=cr,ou=bluepages,o=ibm.com`.
#[must_use]
pub fn leaf_uid(dn: &str) -> Option<&str> {
	let (_, value) = dn.split(',').next()?.split_once('=')?;
	(!value.is_empty()).then_some(value)
}

/// Check `secret` for the person identified by `identifier`. Unknown
/// identifiers and empty secrets are rejected without contacting the LDAP
/// server.
pub async fn authenticate<D, V>(directory: &D, verifier: &V, identifier: &str, secret: &str) -> bool
where
	D: Directory + ?Sized,
	V: CredentialVerifier + ?Sized,
{
	if secret.is_empty() {
		debug!(identifier, "Refusing empty secret");
		return false;
	}

	let dn = match directory.resolve_dn(identifier).await {
		Ok(Some(dn)) => dn,
		Ok(None) => {
			debug!(identifier, "Unknown identifier");
			return false;
		}
		Err(err) => {
			warn!(identifier, "Resolving DN failed: {err}");
			return false;
		}
	};
	let Some(uid) = leaf_uid(&dn) else {
		warn!(dn, "DN has no leading attribute value");
		return false;
	};

	verifier.verify(&dn, uid, secret).await
}
