use std::ops::Bound;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A scalar compared against a stored field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(String),
}
impl FieldValue {
	pub fn to_value(&self) -> Value {
		match self {
			Self::Bool(value) => Value::Bool(*value),
			Self::Int(value) => Value::from(*value),
			Self::Float(value) => Value::from(*value),
			Self::Str(value) => Value::String(value.clone()),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(value) => Some(value),
			_ => None,
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

impl From<&String> for FieldValue {
	fn from(value: &String) -> Self {
		Self::Str(value.clone())
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<u32> for FieldValue {
	fn from(value: u32) -> Self {
		Self::Int(value.into())
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

/// Allowed edit distance for a fuzzy predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fuzziness {
	/// Let the index pick the distance from the term length.
	Auto,
	Edits(u32),
}

/// An atomic predicate over one field (or, for [`Condition::Ids`], over document identity).
///
/// Conditions are immutable once built. Every constructor checks the structural shape of its
/// arguments and reports a malformed predicate as [`Error::InvalidCondition`].
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
	Term { field: String, value: FieldValue },
	Terms { field: String, values: Vec<FieldValue> },
	Exists { field: String },
	Range { field: String, lower: Bound<i64>, upper: Bound<i64> },
	Fuzzy {
		field: String,
		text: String,
		fuzziness: Fuzziness,
		prefix_length: u32,
		max_expansions: u32,
	},
	Match { field: String, text: String },
	BestFields {
		fields: Vec<String>,
		text: String,
		tie_breaker: f64,
		minimum_should_match: String,
	},
	Regexp { field: String, pattern: String },
	Wildcard { field: String, pattern: String },
	Ids { ids: Vec<String>, doc_type: Option<String> },
}
impl Condition {
	pub fn term(field: impl Into<String>, value: impl Into<FieldValue>) -> Result<Self> {
		Ok(Self::Term { field: require_field(field)?, value: value.into() })
	}

	pub fn terms<I, V>(field: impl Into<String>, values: I) -> Result<Self>
	where
		I: IntoIterator<Item = V>,
		V: Into<FieldValue>,
	{
		Ok(Self::Terms {
			field: require_field(field)?,
			values: values.into_iter().map(Into::into).collect(),
		})
	}

	pub fn exists(field: impl Into<String>) -> Result<Self> {
		Ok(Self::Exists { field: require_field(field)? })
	}

	pub fn range(field: impl Into<String>, lower: Bound<i64>, upper: Bound<i64>) -> Result<Self> {
		let field = require_field(field)?;

		if let (Some(min), Some(max)) = (bound_value(&lower), bound_value(&upper))
			&& min > max
		{
			return Err(Error::InvalidCondition {
				field,
				message: format!("range lower bound {min} is greater than upper bound {max}."),
			});
		}

		Ok(Self::Range { field, lower, upper })
	}

	pub fn fuzzy(
		field: impl Into<String>,
		text: impl Into<String>,
		fuzziness: Fuzziness,
		prefix_length: u32,
		max_expansions: u32,
	) -> Result<Self> {
		let field = require_field(field)?;

		if max_expansions == 0 {
			return Err(Error::InvalidCondition {
				field,
				message: "fuzzy max_expansions must be greater than zero.".to_string(),
			});
		}

		Ok(Self::Fuzzy { field, text: text.into(), fuzziness, prefix_length, max_expansions })
	}

	pub fn match_text(field: impl Into<String>, text: impl Into<String>) -> Result<Self> {
		Ok(Self::Match { field: require_field(field)?, text: text.into() })
	}

	/// Multi-field text predicate scored by the best matching field, blending the others in
	/// with `tie_breaker`.
	pub fn best_fields<I, F>(
		fields: I,
		text: impl Into<String>,
		tie_breaker: f64,
		minimum_should_match: impl Into<String>,
	) -> Result<Self>
	where
		I: IntoIterator<Item = F>,
		F: Into<String>,
	{
		let fields =
			fields.into_iter().map(|field| require_field(field)).collect::<Result<Vec<_>>>()?;

		if fields.is_empty() {
			return Err(Error::InvalidCondition {
				field: String::new(),
				message: "multi-match requires at least one field.".to_string(),
			});
		}
		if !(0.0..=1.0).contains(&tie_breaker) {
			return Err(Error::InvalidCondition {
				field: fields.join(","),
				message: "multi-match tie_breaker must be in the range 0.0-1.0.".to_string(),
			});
		}

		Ok(Self::BestFields {
			fields,
			text: text.into(),
			tie_breaker,
			minimum_should_match: minimum_should_match.into(),
		})
	}

	pub fn regexp(field: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
		let field = require_field(field)?;
		let pattern = require_pattern(&field, pattern)?;

		Ok(Self::Regexp { field, pattern })
	}

	pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
		let field = require_field(field)?;
		let pattern = require_pattern(&field, pattern)?;

		Ok(Self::Wildcard { field, pattern })
	}

	/// Matches documents by id. An empty id list is legal and matches nothing.
	pub fn ids<I, S>(ids: I, doc_type: Option<&str>) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		if let Some(doc_type) = doc_type
			&& doc_type.trim().is_empty()
		{
			return Err(Error::InvalidCondition {
				field: "_id".to_string(),
				message: "ids document type must be non-empty when given.".to_string(),
			});
		}

		Ok(Self::Ids {
			ids: ids.into_iter().map(Into::into).collect(),
			doc_type: doc_type.map(str::to_string),
		})
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Term { .. } => "term",
			Self::Terms { .. } => "terms",
			Self::Exists { .. } => "exists",
			Self::Range { .. } => "range",
			Self::Fuzzy { .. } => "fuzzy",
			Self::Match { .. } => "match",
			Self::BestFields { .. } => "multi_match",
			Self::Regexp { .. } => "regexp",
			Self::Wildcard { .. } => "wildcard",
			Self::Ids { .. } => "ids",
		}
	}

	/// The single field this condition targets, if any.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Term { field, .. }
			| Self::Terms { field, .. }
			| Self::Exists { field }
			| Self::Range { field, .. }
			| Self::Fuzzy { field, .. }
			| Self::Match { field, .. }
			| Self::Regexp { field, .. }
			| Self::Wildcard { field, .. } => Some(field),
			Self::BestFields { .. } | Self::Ids { .. } => None,
		}
	}
}

fn require_field(field: impl Into<String>) -> Result<String> {
	let field = field.into();

	if field.trim().is_empty() {
		return Err(Error::InvalidCondition {
			field,
			message: "field name must be non-empty.".to_string(),
		});
	}

	Ok(field)
}

fn require_pattern(field: &str, pattern: impl Into<String>) -> Result<String> {
	let pattern = pattern.into();

	if pattern.is_empty() {
		return Err(Error::InvalidCondition {
			field: field.to_string(),
			message: "pattern must be non-empty.".to_string(),
		});
	}

	Ok(pattern)
}

fn bound_value(bound: &Bound<i64>) -> Option<i64> {
	match bound {
		Bound::Included(value) | Bound::Excluded(value) => Some(*value),
		Bound::Unbounded => None,
	}
}
