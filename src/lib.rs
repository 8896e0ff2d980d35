//! Client for the Bluepages employee directory.
//!
//! The directory is exposed in two ways: an HTTP API answering profile
//! lookups as XML (`mail=<identifier>.list/byxml`) and report lists as JSON
//! (`manager=<dn>.list/byjson`), and an LDAPS interface used to check
//! credentials. This crate wraps both behind [`Bluepages`].
//!
//! Most accessors fetch a single profile and project one or more attributes
//! out of it. Attributes the directory does not return come back as
//! [`NOT_AVAILABLE`] rather than as an error. The exception is the reporting
//! hierarchy: [`HierarchyWalker::all_reports`] expands a manager's direct
//! reports recursively, fetching sibling subtrees concurrently.
//!
//! # Getting started
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use bluepages::{Bluepages, Config};
//!
//! // Configuration can also be deserialized from TOML with
//! // `Config::from_file`.
//! let client = Bluepages::new(Config::bluepages()?)?;
//!
//! if client.employee_exists("jdoe@us.ibm.com").await? {
//!     println!("{}", client.name("jdoe@us.ibm.com").await?);
//!     for report in client.all_reports("jdoe@us.ibm.com").await? {
//!         println!("{} <{}>", report.name, report.mail);
//!     }
//! }
//!
//! let authenticated = client.authenticate("jdoe@us.ibm.com", "secret").await;
//! println!("Authenticated: {authenticated}");
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//! * Nothing is cached; every accessor issues its own request.
//! * A report list that fails to load is treated as empty, so a walk can
//!   silently miss a subtree. The failure is logged.
//! * Authentication answers only yes or no. A wrong password and an
//!   unreachable server look the same to the caller.
//! * Cycle detection in hierarchy walks is off unless enabled in
//!   [`WalkConfig`]; a directory with a reporting loop would otherwise be
//!   walked forever.

pub mod client;
pub mod config;
pub mod employee;
pub mod entry;
pub mod error;
pub mod hierarchy;
pub mod http;
pub mod ldap;
pub mod normalize;

pub use ldap3;

pub use crate::{
	client::Bluepages,
	config::{Config, ConnectionConfig, HttpConfig, LdapConfig, TlsConfig, WalkConfig},
	employee::{EmployeeInfo, EmployeeLocation},
	entry::{AttributeSource, ProfileDocument, NOT_AVAILABLE},
	error::Error,
	hierarchy::{format_dn, HierarchyWalker, ReportRecord},
	http::{Directory, HttpDirectory},
	ldap::{CredentialVerifier, LdapVerifier},
	normalize::{objectise, AttributeBag, AttributeValue, SearchResponse},
};
