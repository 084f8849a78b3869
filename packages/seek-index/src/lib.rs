//! The execution boundary: a search index that runs one [`SearchRequest`] at a time.

pub mod dsl;
pub mod elasticsearch;
pub mod response;

mod error;

pub use elasticsearch::ElasticsearchClient;
pub use error::{Error, Result};

use std::{future::Future, pin::Pin};

use seek_query::{SearchRequest, SearchResponse};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SearchBackend
where
	Self: Send + Sync,
{
	/// Runs one request. Transport and index-side failures are both reported as `Err`.
	fn execute<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>>;

	/// Serialized body of the most recently executed request, kept for diagnostics only.
	fn last_raw_request(&self) -> Option<String>;
}
