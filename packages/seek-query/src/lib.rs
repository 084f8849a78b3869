//! Typed query model: condition primitives, boolean combination with boosts, the tiered
//! exact-or-fuzzy builder, delimited-list membership, pagination and the request/response shapes
//! exchanged with a search index.

pub mod boolean;
pub mod condition;
pub mod membership;
pub mod pagination;
pub mod relevance;
pub mod request;

mod error;

pub use boolean::{BoolQuery, DEFAULT_BOOST, Occur, Query, QueryNode};
pub use condition::{Condition, FieldValue, Fuzziness};
pub use error::{Error, Result};
pub use membership::list_contains;
pub use pagination::Page;
pub use relevance::{Tier, exact_or_fuzzy, tiered, tiered_with};
pub use request::{Hit, SearchRequest, SearchResponse, Sort, SortField, SortOrder, value_equals};
