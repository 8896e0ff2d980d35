//! Flattening of `byjson` search responses into attribute bags.
//!
//! The JSON API reports every attribute as a list of values, whether the
//! schema declares it single- or multi-valued. Callers almost always want a
//! plain string, so lists with exactly one element are collapsed into a
//! scalar while longer (or empty) lists are kept as they are.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{entry::AttributeSource, error::Error};

/// The value of a normalized attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
	/// The attribute had exactly one value.
	Scalar(String),
	/// The attribute had zero or several values, in directory order.
	List(Vec<String>),
}

impl AttributeValue {
	/// The scalar, or the first element of a list.
	#[must_use]
	pub fn first(&self) -> Option<&str> {
		match self {
			AttributeValue::Scalar(value) => Some(value),
			AttributeValue::List(values) => values.first().map(String::as_str),
		}
	}
}

impl From<Vec<String>> for AttributeValue {
	fn from(mut values: Vec<String>) -> Self {
		match values.pop() {
			Some(value) if values.is_empty() => AttributeValue::Scalar(value),
			Some(value) => {
				values.push(value);
				AttributeValue::List(values)
			}
			None => AttributeValue::List(values),
		}
	}
}

/// Normalized attributes of one directory entry.
pub type AttributeBag = HashMap<String, AttributeValue>;

impl AttributeSource for AttributeBag {
	fn attr_first(&self, attr: &str) -> Option<&str> {
		self.get(attr)?.first()
	}
}

/// A raw `byjson` response: `{ "search": { "entry": [ ... ] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
	/// The search result.
	#[serde(default)]
	pub search: SearchResult,
}

/// The `search` member of a [`SearchResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
	/// Matching entries. Absent when nothing matched.
	#[serde(default)]
	pub entry: Vec<RawEntry>,
}

/// An entry as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
	/// Attributes of the entry.
	#[serde(default)]
	pub attribute: Vec<RawAttribute>,
}

/// An attribute as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAttribute {
	/// Attribute name.
	pub name: String,
	/// All values of the attribute.
	#[serde(default)]
	pub value: Vec<String>,
}

impl SearchResponse {
	/// Parse a response body.
	pub fn parse(json: &str) -> Result<Self, Error> {
		Ok(serde_json::from_str(json)?)
	}
}

/// Reduce every entry of `response` to an [`AttributeBag`], in response
/// order.
#[must_use]
pub fn objectise(response: SearchResponse) -> Vec<AttributeBag> {
	response
		.search
		.entry
		.into_iter()
		.map(|entry| {
			entry
				.attribute
				.into_iter()
				.map(|attribute| (attribute.name, AttributeValue::from(attribute.value)))
				.collect()
		})
		.collect()
}
