use serde_json::Value;

use crate::{Error, Result};
use seek_query::{Hit, SearchResponse};

pub fn parse_search_response(json: Value) -> Result<SearchResponse> {
	if let Some(error) = json.get("error")
		&& !error.is_null()
	{
		return Err(Error::Index {
			status: json.get("status").and_then(Value::as_u64).map(|status| status as u16),
			message: error_reason(error),
		});
	}

	let hits = json.get("hits").ok_or_else(|| Error::InvalidResponse {
		message: "Search response is missing hits.".to_string(),
	})?;
	let total = hits
		.get("total")
		.and_then(|total| total.as_u64().or_else(|| total.get("value").and_then(Value::as_u64)));
	let items = hits.get("hits").and_then(Value::as_array).ok_or_else(|| Error::InvalidResponse {
		message: "Search response is missing hits.hits array.".to_string(),
	})?;
	let hits =
		items.iter().cloned().map(serde_json::from_value::<Hit>).collect::<Result<Vec<_>, _>>()?;

	Ok(SearchResponse { total, hits })
}

/// Best human-readable reason from an index error payload.
pub fn error_reason(error: &Value) -> String {
	error
		.get("root_cause")
		.and_then(Value::as_array)
		.and_then(|causes| causes.first())
		.and_then(|cause| cause.get("reason"))
		.or_else(|| error.get("reason"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| error.to_string())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::parse_search_response;
	use crate::Error;

	#[test]
	fn decodes_hits_in_order() {
		let json = json!({
			"took": 3,
			"hits": {
				"total": 2,
				"hits": [
					{ "_index": "contact", "_type": "company", "_id": "company_1", "_score": 2.0, "_source": { "cid": 1 } },
					{ "_index": "contact", "_type": "user", "_id": "user_9", "_score": 1.0, "_source": { "uuid": "u9" } }
				]
			}
		});
		let response = parse_search_response(json).expect("valid response");

		assert_eq!(response.total, Some(2));
		assert_eq!(response.hits.len(), 2);
		assert_eq!(response.hits[0].id, "company_1");
		assert_eq!(response.hits[1].field_str("uuid"), Some("u9"));
	}

	#[test]
	fn accepts_object_totals_and_missing_type() {
		let json = json!({
			"hits": {
				"total": { "value": 1, "relation": "eq" },
				"hits": [{ "_index": "mission", "_id": "7", "_score": null, "_source": {} }]
			}
		});
		let response = parse_search_response(json).expect("valid response");

		assert_eq!(response.total, Some(1));
		assert_eq!(response.hits[0].doc_type, None);
		assert_eq!(response.hits[0].score, None);
	}

	#[test]
	fn index_errors_surface_root_cause() {
		let json = json!({
			"error": {
				"root_cause": [{ "type": "query_parsing_exception", "reason": "bad fuzzy" }],
				"reason": "all shards failed"
			},
			"status": 400
		});
		let err = parse_search_response(json).expect_err("expected index error");

		assert!(matches!(err, Error::Index { status: Some(400), ref message } if message == "bad fuzzy"));
	}

	#[test]
	fn missing_hits_is_invalid() {
		let err = parse_search_response(json!({ "took": 1 })).expect_err("expected error");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
