use std::ops::Bound;

use regex::Regex;
use serde_json::{Map, Value};

use seek_query::{BoolQuery, Condition, Fuzziness, Occur, Query, QueryNode, value_equals};

/// A stored document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
	pub index: String,
	pub doc_type: Option<String>,
	pub id: String,
	pub source: Map<String, Value>,
}
impl Document {
	pub fn new(index: &str, id: &str, source: Value) -> Self {
		Self {
			index: index.to_string(),
			doc_type: None,
			id: id.to_string(),
			source: match source {
				Value::Object(map) => map,
				_ => Map::new(),
			},
		}
	}

	pub fn with_type(mut self, doc_type: &str) -> Self {
		self.doc_type = Some(doc_type.to_string());

		self
	}
}

/// Scores `doc` against `query`, or `None` when it does not match.
///
/// Matching leaves score by how many analysed tokens they hit; bool nodes add their children's
/// scores and multiply the sum by their own boost, so boosts compound from root to leaf.
pub fn evaluate(query: &Query, doc: &Document) -> Option<f64> {
	score_bool(query.root(), doc)
}

fn score_bool(node: &BoolQuery, doc: &Document) -> Option<f64> {
	let mut total = 0.0;

	match node.occur() {
		Occur::Must =>
			for child in node.children() {
				total += score_node(child, doc)?;
			},
		Occur::Should => {
			let mut matched = node.is_empty();

			for child in node.children() {
				if let Some(score) = score_node(child, doc) {
					matched = true;
					total += score;
				}
			}

			if !matched {
				return None;
			}
		},
		Occur::MustNot =>
			if node.children().iter().any(|child| score_node(child, doc).is_some()) {
				return None;
			},
	}

	Some(total * f64::from(node.boost()))
}

fn score_node(node: &QueryNode, doc: &Document) -> Option<f64> {
	match node {
		QueryNode::Condition(condition) => score_condition(condition, doc),
		QueryNode::Bool(inner) => score_bool(inner, doc),
	}
}

fn score_condition(condition: &Condition, doc: &Document) -> Option<f64> {
	let source = &doc.source;
	let matched = match condition {
		Condition::Term { field, value } =>
			field_values(source, field).iter().any(|stored| value_equals(stored, value)),
		Condition::Terms { field, values } => field_values(source, field)
			.iter()
			.any(|stored| values.iter().any(|value| value_equals(stored, value))),
		Condition::Exists { field } => !field_values(source, field).is_empty(),
		Condition::Range { field, lower, upper } => field_values(source, field)
			.iter()
			.filter_map(|stored| as_number(stored))
			.any(|number| within(number, lower, upper)),
		Condition::Fuzzy { field, text, fuzziness, prefix_length, .. } => {
			return fuzzy_score(source, field, text, *fuzziness, *prefix_length);
		},
		Condition::Match { field, text } => {
			let hits = matched_tokens(source, field, text);

			return (hits > 0).then_some(hits as f64);
		},
		Condition::BestFields { fields, text, tie_breaker, minimum_should_match } => {
			return best_fields_score(source, fields, text, *tie_breaker, minimum_should_match);
		},
		Condition::Regexp { field, pattern } => anchored(pattern)
			.is_some_and(|regex| keyword_values(source, field).iter().any(|v| regex.is_match(v))),
		Condition::Wildcard { field, pattern } => anchored(&glob_to_regex(pattern))
			.is_some_and(|regex| keyword_values(source, field).iter().any(|v| regex.is_match(v))),
		Condition::Ids { ids, doc_type } =>
			ids.iter().any(|id| *id == doc.id)
				&& doc_type.as_ref().is_none_or(|expected| doc.doc_type.as_ref() == Some(expected)),
	};

	matched.then_some(1.0)
}

fn field_values<'a>(source: &'a Map<String, Value>, field: &str) -> Vec<&'a Value> {
	match source.get(field) {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(items)) => items.iter().filter(|item| !item.is_null()).collect(),
		Some(value) => vec![value],
	}
}

fn keyword_values(source: &Map<String, Value>, field: &str) -> Vec<String> {
	field_values(source, field)
		.into_iter()
		.map(|value| match value {
			Value::String(text) => text.clone(),
			other => other.to_string(),
		})
		.collect()
}

fn tokens(text: &str) -> Vec<String> {
	text.split(|c: char| !c.is_alphanumeric())
		.filter(|token| !token.is_empty())
		.map(str::to_lowercase)
		.collect()
}

fn field_tokens(source: &Map<String, Value>, field: &str) -> Vec<String> {
	keyword_values(source, field).iter().flat_map(|value| tokens(value)).collect()
}

fn matched_tokens(source: &Map<String, Value>, field: &str, text: &str) -> usize {
	let stored = field_tokens(source, field);

	tokens(text).iter().filter(|token| stored.contains(token)).count()
}

fn fuzzy_score(
	source: &Map<String, Value>,
	field: &str,
	text: &str,
	fuzziness: Fuzziness,
	prefix_length: u32,
) -> Option<f64> {
	let needle = text.to_lowercase();

	if needle.is_empty() {
		return None;
	}

	let max_edits = match fuzziness {
		Fuzziness::Edits(edits) => edits as usize,
		Fuzziness::Auto => match needle.chars().count() {
			0..=2 => 0,
			3..=5 => 1,
			_ => 2,
		},
	};
	let prefix: String = needle.chars().take(prefix_length as usize).collect();
	let best = field_tokens(source, field)
		.iter()
		.filter(|token| token.starts_with(&prefix))
		.map(|token| strsim::levenshtein(token, &needle))
		.filter(|distance| *distance <= max_edits)
		.min()?;

	Some(1.0 / (1.0 + best as f64))
}

fn best_fields_score(
	source: &Map<String, Value>,
	fields: &[String],
	text: &str,
	tie_breaker: f64,
	minimum_should_match: &str,
) -> Option<f64> {
	let query_tokens = tokens(text).len();

	if query_tokens == 0 {
		return None;
	}

	let required = required_matches(query_tokens, minimum_should_match);
	let mut scores = fields
		.iter()
		.map(|field| matched_tokens(source, field, text))
		.filter(|hits| *hits >= required)
		.map(|hits| hits as f64)
		.collect::<Vec<_>>();

	scores.sort_by(|a, b| b.total_cmp(a));

	let (best, rest) = scores.split_first()?;

	Some(best + tie_breaker * rest.iter().sum::<f64>())
}

fn required_matches(query_tokens: usize, minimum_should_match: &str) -> usize {
	let raw = minimum_should_match.trim();
	let required = match raw.strip_suffix('%') {
		Some(percent) => percent
			.trim()
			.parse::<f64>()
			.map(|percent| (query_tokens as f64 * percent / 100.0).floor() as usize)
			.unwrap_or(1),
		None => raw.parse::<usize>().unwrap_or(1),
	};

	required.clamp(1, query_tokens)
}

fn as_number(value: &Value) -> Option<i64> {
	match value {
		Value::Number(number) => number.as_i64().or_else(|| number.as_f64().map(|f| f as i64)),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

fn within(value: i64, lower: &Bound<i64>, upper: &Bound<i64>) -> bool {
	let above = match lower {
		Bound::Included(min) => value >= *min,
		Bound::Excluded(min) => value > *min,
		Bound::Unbounded => true,
	};
	let below = match upper {
		Bound::Included(max) => value <= *max,
		Bound::Excluded(max) => value < *max,
		Bound::Unbounded => true,
	};

	above && below
}

// Patterns the regex crate cannot compile never match, mirroring an index that ignores them.
fn anchored(pattern: &str) -> Option<Regex> {
	Regex::new(&format!("^(?:{pattern})$")).ok()
}

fn glob_to_regex(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len() * 2);

	for c in pattern.chars() {
		match c {
			'*' => out.push_str(".*"),
			'?' => out.push('.'),
			other => out.push_str(&regex::escape(&other.to_string())),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{Document, evaluate, required_matches};
	use seek_query::{BoolQuery, Condition, Query, list_contains};

	#[test]
	fn percentage_minimum_rounds_down_but_requires_one() {
		assert_eq!(required_matches(1, "30%"), 1);
		assert_eq!(required_matches(4, "30%"), 1);
		assert_eq!(required_matches(10, "30%"), 3);
		assert_eq!(required_matches(3, "5"), 3);
	}

	#[test]
	fn boosts_multiply_down_the_tree() {
		let doc = Document::new("contact", "1", json!({ "name": "acme" }));
		let leaf = || Condition::match_text("name", "acme").expect("valid match");
		let nested = BoolQuery::must([BoolQuery::should([leaf()]).with_boost(10.0).expect("boost")])
			.with_boost(100.0)
			.expect("boost");

		assert_eq!(evaluate(&Query::new(nested), &doc), Some(1000.0));
	}

	#[test]
	fn wildcard_matches_whole_keyword() {
		let query = Query::new(list_contains("psids", "p1").expect("membership"));
		let hit = Document::new("mission", "1", json!({ "psids": "p0,p1,p2" }));
		let near_miss = Document::new("mission", "2", json!({ "psids": "p0,p10,p2" }));

		assert!(evaluate(&query, &hit).is_some());
		assert!(evaluate(&query, &near_miss).is_none());
	}
}
