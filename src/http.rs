//! Lookups against the HTTP directory API.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::{
	config::HttpConfig,
	entry::ProfileDocument,
	error::Error,
	normalize::SearchResponse,
};

/// The two lookups every higher level operation is built from.
#[async_trait]
pub trait Directory: Send + Sync {
	/// Fetch and parse the XML profile of the person identified by
	/// `identifier` (an email-shaped handle).
	async fn profile(&self, identifier: &str) -> Result<ProfileDocument, Error>;

	/// Fetch the JSON list of people reporting to `dn`. An empty
	/// `attributes` slice requests every attribute.
	async fn reports(&self, dn: &str, attributes: &[&str]) -> Result<SearchResponse, Error>;

	/// Resolve an identifier to its distinguished name. `None` means the
	/// directory does not know the identifier.
	async fn resolve_dn(&self, identifier: &str) -> Result<Option<String>, Error> {
		Ok(self.profile(identifier).await?.dn().map(str::to_owned))
	}

	/// Like [`Directory::reports`], but a failed request is logged and
	/// treated as an empty list so a single broken branch does not abort a
	/// hierarchy walk.
	async fn reports_or_empty(&self, dn: &str, attributes: &[&str]) -> SearchResponse {
		match self.reports(dn, attributes).await {
			Ok(response) => response,
			Err(err) => {
				warn!(dn, "Fetching report list failed: {err}");
				SearchResponse::default()
			}
		}
	}
}

/// [`Directory`] backed by the `byxml`/`byjson` HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
	/// Shared HTTP client.
	client: reqwest::Client,
	/// API base, lookups are appended to it verbatim.
	api_url: Url,
}

impl HttpDirectory {
	/// Create a client for the API at `api_url`.
	pub fn new(api_url: Url, config: &HttpConfig) -> Result<Self, Error> {
		let client = reqwest::Client::builder()
			.timeout(config.timeout)
			.connect_timeout(config.connect_timeout)
			.build()?;
		Ok(Self { client, api_url })
	}

	/// URL of a lookup. The base may carry a query (`slaphapi?ibmperson`), so
	/// the lookup is concatenated rather than joined.
	fn endpoint(&self, lookup: &str) -> String {
		format!("{}/{lookup}", self.api_url.as_str().trim_end_matches('/'))
	}

	/// Perform a GET request and return the body of a successful response.
	async fn get(&self, url: &str) -> Result<String, Error> {
		debug!(url, "Querying directory");
		let response = self.client.get(url).send().await?.error_for_status()?;
		Ok(response.text().await?)
	}
}

/// Lookup path listing the reports of `dn`.
fn reports_lookup(dn: &str, attributes: &[&str]) -> String {
	if attributes.is_empty() {
		format!("manager={dn}.list/byjson")
	} else {
		format!("manager={dn}.list/byjson?{}", attributes.join("&"))
	}
}

#[async_trait]
impl Directory for HttpDirectory {
	async fn profile(&self, identifier: &str) -> Result<ProfileDocument, Error> {
		let body = self.get(&self.endpoint(&format!("mail={identifier}.list/byxml"))).await?;
		ProfileDocument::parse(&body)
	}

	async fn reports(&self, dn: &str, attributes: &[&str]) -> Result<SearchResponse, Error> {
		let body = self.get(&self.endpoint(&reports_lookup(dn, attributes))).await?;
		SearchResponse::parse(&body)
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use url::Url;

	use super::{reports_lookup, HttpDirectory};
	use crate::config::{HttpConfig, BLUEPAGES_API_URL};

	#[test]
	fn endpoint_keeps_base_query() {
		let directory =
			HttpDirectory::new(Url::parse(BLUEPAGES_API_URL).unwrap(), &HttpConfig::default())
				.unwrap();

		assert_eq!(
			directory.endpoint("mail=aromeroh@cr.ibm.com.list/byxml"),
			"https://bluepages.ibm.com/BpHttpApisv3/slaphapi?ibmperson/mail=aromeroh@cr.ibm.com.list/byxml"
		);
	}

	#[test]
	fn endpoint_without_double_slash() {
		let directory =
			HttpDirectory::new(Url::parse("http://localhost:8080").unwrap(), &HttpConfig::default())
				.unwrap();

		assert_eq!(directory.endpoint("mail=a.list/byxml"), "http://localhost:8080/mail=a.list/byxml");
	}

	#[test]
	fn report_attribute_selection() {
		let dn = "uid=000001631,c=cr,ou=bluepages,o=ibm.com";

		assert_eq!(reports_lookup(dn, &[]), format!("manager={dn}.list/byjson"));
		assert_eq!(reports_lookup(dn, &["mail"]), format!("manager={dn}.list/byjson?mail"));
		assert_eq!(
			reports_lookup(dn, &["mail", "uid"]),
			format!("manager={dn}.list/byjson?mail&uid")
		);
	}
}
