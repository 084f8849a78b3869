use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{FieldValue, Page, Query};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	Asc,
	Desc,
}
impl SortOrder {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortField {
	pub field: String,
	pub order: SortOrder,
}

/// Ordered sort keys; an absent sort means relevance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort {
	fields: Vec<SortField>,
}
impl Sort {
	pub fn by(field: impl Into<String>, order: SortOrder) -> Self {
		Self { fields: vec![SortField { field: field.into(), order }] }
	}

	pub fn then(mut self, field: impl Into<String>, order: SortOrder) -> Self {
		self.fields.push(SortField { field: field.into(), order });

		self
	}

	pub fn fields(&self) -> &[SortField] {
		&self.fields
	}
}

/// One query submission: target index, source projection, query, sort and window.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
	pub index: String,
	pub source: Vec<String>,
	pub query: Query,
	pub sort: Option<Sort>,
	pub from: u64,
	/// `None` leaves the window size to the index default.
	pub size: Option<u32>,
}
impl SearchRequest {
	pub fn new(index: impl Into<String>, query: Query) -> Self {
		Self { index: index.into(), source: Vec::new(), query, sort: None, from: 0, size: None }
	}

	pub fn with_source(mut self, fields: &[&str]) -> Self {
		self.source = fields.iter().map(|field| field.to_string()).collect();

		self
	}

	pub fn with_sort(mut self, sort: Sort) -> Self {
		self.sort = Some(sort);

		self
	}

	pub fn with_page(mut self, page: Page) -> Self {
		self.from = page.offset();
		self.size = Some(page.limit());

		self
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
	#[serde(rename = "_index")]
	pub index: String,
	#[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
	pub doc_type: Option<String>,
	#[serde(rename = "_id")]
	pub id: String,
	#[serde(rename = "_score", default)]
	pub score: Option<f64>,
	#[serde(rename = "_source", default)]
	pub source: Map<String, Value>,
}
impl Hit {
	pub fn field_str(&self, name: &str) -> Option<&str> {
		self.source.get(name).and_then(Value::as_str)
	}

	/// Loose equality between a stored field and an expected scalar: numbers compare by value
	/// and numeric strings compare equal to the number they spell.
	pub fn field_equals(&self, name: &str, expected: &FieldValue) -> bool {
		self.source.get(name).is_some_and(|value| value_equals(value, expected))
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub total: Option<u64>,
	pub hits: Vec<Hit>,
}

pub fn value_equals(value: &Value, expected: &FieldValue) -> bool {
	match (value, expected) {
		(Value::String(actual), FieldValue::Str(expected)) => actual == expected,
		(Value::Bool(actual), FieldValue::Bool(expected)) => actual == expected,
		(Value::Number(actual), FieldValue::Int(expected)) => match actual.as_i64() {
			Some(actual) => actual == *expected,
			None => actual.as_f64() == Some(*expected as f64),
		},
		(Value::Number(actual), FieldValue::Float(expected)) => actual.as_f64() == Some(*expected),
		(Value::String(actual), FieldValue::Int(expected)) =>
			actual.trim().parse::<i64>().is_ok_and(|v| v == *expected),
		(Value::String(actual), FieldValue::Float(expected)) =>
			actual.trim().parse::<f64>().is_ok_and(|v| v == *expected),
		(Value::Number(actual), FieldValue::Str(expected)) => actual.to_string() == *expected,
		_ => false,
	}
}
