//! Test doubles for the search execution boundary.
//!
//! [`MemoryIndex`] evaluates query trees against in-memory JSON documents so ranking and filter
//! semantics can be asserted end to end. [`CannedBackend`] returns a fixed outcome and records
//! what it was asked to run.

mod canned;
mod evaluate;
mod memory;

pub use canned::CannedBackend;
pub use evaluate::{Document, evaluate};
pub use memory::MemoryIndex;

use serde_json::{Map, Value};

use seek_query::Hit;

/// Builds a hit the way the index would return it.
pub fn hit(index: &str, doc_type: Option<&str>, id: &str, source: Value) -> Hit {
	Hit {
		index: index.to_string(),
		doc_type: doc_type.map(str::to_string),
		id: id.to_string(),
		score: Some(1.0),
		source: match source {
			Value::Object(map) => map,
			_ => Map::new(),
		},
	}
}
