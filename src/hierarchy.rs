//! Walking the management hierarchy below a manager.
//!
//! The report list endpoint does not return the DN of a report, so it is put
//! back together from the `uid`, `c`, `ou` and `o` attributes before the walk
//! can descend into that report's own reports. Sibling subtrees are fetched
//! concurrently; within a subtree a level has to be resolved before the next
//! one can be requested.

use futures::future::{join_all, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::{
	config::WalkConfig,
	entry::AttributeSource,
	error::Error,
	http::Directory,
	normalize::{objectise, AttributeBag},
};

/// A person found below a manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
	/// Common name (first value of `cn`).
	pub name: String,
	/// Distinguished name, rebuilt from the entry's attributes.
	pub dn: String,
	/// User id.
	pub uid: String,
	/// Email address.
	pub mail: String,
	/// Work location code.
	pub work_location: String,
}

impl ReportRecord {
	/// Project an attribute bag from a report list. Fails when one of the
	/// attributes making up the DN is missing.
	pub fn from_bag(bag: &AttributeBag) -> Result<Self, Error> {
		let required =
			|attr: &str| bag.attr_first(attr).ok_or_else(|| Error::Missing(attr.to_owned()));
		let uid = required("uid")?;
		let dn = format_dn(uid, required("c")?, required("ou")?, required("o")?);
		Ok(Self {
			name: bag.attr_value("cn").to_owned(),
			dn,
			uid: uid.to_owned(),
			mail: bag.attr_value("mail").to_owned(),
			work_location: bag.attr_value("workloc").to_owned(),
		})
	}
}

/// Build the DN of a person entry: `uid=<uid>,c=<c>,ou=<ou>,o=<o>`.
#[must_use]
pub fn format_dn(uid: &str, c: &str, ou: &str, o: &str) -> String {
	format!("uid={uid},c={c},ou={ou},o={o}")
}

/// Expands direct reports into the whole reporting tree.
#[derive(Debug)]
pub struct HierarchyWalker<'d, D> {
	/// Where report lists come from.
	directory: &'d D,
	/// Depth and cycle limits.
	config: WalkConfig,
	/// Caps the number of report list requests in flight, if configured.
	permits: Option<Semaphore>,
}

impl<'d, D: Directory> HierarchyWalker<'d, D> {
	/// Create a walker reading from `directory`.
	#[must_use]
	pub fn new(directory: &'d D, config: WalkConfig) -> Self {
		let permits = config.max_concurrency.map(|max| Semaphore::new(max.get()));
		Self { directory, config, permits }
	}

	/// The people reporting directly to `dn`, in directory order. Entries
	/// that lack one of the DN attributes are skipped, and a failed request
	/// yields an empty list.
	pub async fn direct_reports(&self, dn: &str) -> Vec<ReportRecord> {
		let response = {
			// Never closed, so acquiring cannot fail.
			let _permit = match &self.permits {
				Some(permits) => permits.acquire().await.ok(),
				None => None,
			};
			self.directory.reports_or_empty(dn, &[]).await
		};

		objectise(response)
			.iter()
			.filter_map(|bag| match ReportRecord::from_bag(bag) {
				Ok(record) => Some(record),
				Err(err) => {
					warn!(manager = dn, "Skipping report that cannot be addressed: {err}");
					None
				}
			})
			.collect()
	}

	/// Everyone below `dn`: each direct report in directory order, followed
	/// immediately by its own subtree in the same order.
	pub async fn all_reports(&self, dn: &str) -> Vec<ReportRecord> {
		self.walk(dn.to_owned(), 1, Vec::new()).await
	}

	/// Expand the reports of `dn`, which sit at `level` below the starting
	/// manager. `lineage` holds the DNs above `dn`.
	fn walk(
		&self,
		dn: String,
		level: usize,
		mut lineage: Vec<String>,
	) -> BoxFuture<'_, Vec<ReportRecord>> {
		async move {
			let reports = self.direct_reports(&dn).await;
			debug!(dn = %dn, level, count = reports.len(), "Fetched direct reports");
			let descend = self.config.max_depth.map_or(true, |max| level < max.get());
			lineage.push(dn);

			let branches = reports
				.into_iter()
				.filter(|report| {
					let cycle = self.config.detect_cycles && lineage.contains(&report.dn);
					if cycle {
						warn!(dn = %report.dn, "Report is its own ancestor, not descending");
					}
					!cycle
				})
				.map(|report| {
					let lineage = lineage.clone();
					async move {
						let subtree = if descend {
							self.walk(report.dn.clone(), level + 1, lineage).await
						} else {
							Vec::new()
						};
						let mut branch = Vec::with_capacity(subtree.len() + 1);
						branch.push(report);
						branch.extend(subtree);
						branch
					}
				});

			join_all(branches).await.into_iter().flatten().collect()
		}
		.boxed()
	}
}
