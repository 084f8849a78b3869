//! Membership tests against fields that store a comma-delimited list such as `"a,b,c"`.
//!
//! A plain term never matches such a field and a substring match collides on shared prefixes,
//! so the token is located with four wildcard patterns, one per position it can occupy.
//! Tokens containing the delimiter or wildcard metacharacters are not escaped.

use crate::{BoolQuery, Condition, Result};

pub const LIST_DELIMITER: char = ',';

/// `should` over the sole, first, last and middle positions of `token` in `field`.
pub fn list_contains(field: &str, token: &str) -> Result<BoolQuery> {
	let patterns = [
		token.to_string(),
		format!("{token}{LIST_DELIMITER}*"),
		format!("*{LIST_DELIMITER}{token}"),
		format!("*{LIST_DELIMITER}{token}{LIST_DELIMITER}*"),
	];
	let conditions = patterns
		.into_iter()
		.map(|pattern| Condition::wildcard(field, pattern))
		.collect::<Result<Vec<_>>>()?;

	Ok(BoolQuery::should(conditions))
}
