//! Serializes the abstract query tree into the Elasticsearch query DSL.

use std::ops::Bound;

use serde_json::{Map, Value};

use seek_query::{
	BoolQuery, Condition, DEFAULT_BOOST, Fuzziness, Query, QueryNode, SearchRequest, Sort,
};

/// Full `_search` body: `_source`, `query`, `sort`, `from` and `size`.
pub fn request_body(request: &SearchRequest) -> Value {
	let mut body = Map::new();

	if !request.source.is_empty() {
		body.insert(
			"_source".to_string(),
			Value::Array(request.source.iter().cloned().map(Value::String).collect()),
		);
	}

	body.insert("query".to_string(), query_value(&request.query));

	if let Some(sort) = request.sort.as_ref()
		&& !sort.fields().is_empty()
	{
		body.insert("sort".to_string(), sort_value(sort));
	}

	body.insert("from".to_string(), Value::from(request.from));

	if let Some(size) = request.size {
		body.insert("size".to_string(), Value::from(size));
	}

	Value::Object(body)
}

pub fn query_value(query: &Query) -> Value {
	bool_value(query.root())
}

pub fn sort_value(sort: &Sort) -> Value {
	Value::Array(
		sort.fields()
			.iter()
			.map(|key| {
				keyed(&key.field, keyed("order", Value::String(key.order.as_str().to_string())))
			})
			.collect(),
	)
}

fn bool_value(node: &BoolQuery) -> Value {
	let mut inner = Map::new();

	inner.insert(
		node.occur().as_str().to_string(),
		Value::Array(node.children().iter().map(node_value).collect()),
	);

	if node.boost() != DEFAULT_BOOST {
		inner.insert("boost".to_string(), Value::from(f64::from(node.boost())));
	}

	keyed("bool", Value::Object(inner))
}

fn node_value(node: &QueryNode) -> Value {
	match node {
		QueryNode::Condition(condition) => condition_value(condition),
		QueryNode::Bool(inner) => bool_value(inner),
	}
}

fn condition_value(condition: &Condition) -> Value {
	let body = match condition {
		Condition::Term { field, value } => keyed(field, value.to_value()),
		Condition::Terms { field, values } =>
			keyed(field, Value::Array(values.iter().map(|value| value.to_value()).collect())),
		Condition::Exists { field } => keyed("field", Value::String(field.clone())),
		Condition::Range { field, lower, upper } => {
			let mut bounds = Map::new();

			match lower {
				Bound::Included(value) => {
					bounds.insert("gte".to_string(), Value::from(*value));
				},
				Bound::Excluded(value) => {
					bounds.insert("gt".to_string(), Value::from(*value));
				},
				Bound::Unbounded => {},
			}
			match upper {
				Bound::Included(value) => {
					bounds.insert("lte".to_string(), Value::from(*value));
				},
				Bound::Excluded(value) => {
					bounds.insert("lt".to_string(), Value::from(*value));
				},
				Bound::Unbounded => {},
			}

			keyed(field, Value::Object(bounds))
		},
		Condition::Fuzzy { field, text, fuzziness, prefix_length, max_expansions } => {
			let fuzziness = match fuzziness {
				Fuzziness::Auto => Value::String("AUTO".to_string()),
				Fuzziness::Edits(edits) => Value::from(*edits),
			};

			keyed(
				field,
				serde_json::json!({
					"value": text,
					"fuzziness": fuzziness,
					"prefix_length": prefix_length,
					"max_expansions": max_expansions,
				}),
			)
		},
		Condition::Match { field, text } => keyed(field, Value::String(text.clone())),
		Condition::BestFields { fields, text, tie_breaker, minimum_should_match } => {
			serde_json::json!({
				"query": text,
				"type": "best_fields",
				"fields": fields,
				"tie_breaker": tie_breaker,
				"minimum_should_match": minimum_should_match,
			})
		},
		Condition::Regexp { field, pattern } | Condition::Wildcard { field, pattern } =>
			keyed(field, Value::String(pattern.clone())),
		Condition::Ids { ids, doc_type } => {
			let mut inner = Map::new();

			if let Some(doc_type) = doc_type {
				inner.insert("type".to_string(), Value::String(doc_type.clone()));
			}

			inner.insert(
				"values".to_string(),
				Value::Array(ids.iter().cloned().map(Value::String).collect()),
			);

			Value::Object(inner)
		},
	};

	keyed(condition.kind(), body)
}

fn keyed(key: &str, value: Value) -> Value {
	let mut map = Map::new();

	map.insert(key.to_string(), value);

	Value::Object(map)
}
