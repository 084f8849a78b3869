use std::sync::Mutex;

use seek_index::{BoxFuture, Error, Result, SearchBackend, dsl};
use seek_query::{Hit, SearchRequest, SearchResponse};

enum Outcome {
	Hits(Vec<Hit>),
	Failure(String),
}

/// Returns the same outcome for every request, regardless of the query.
pub struct CannedBackend {
	outcome: Outcome,
	requests: Mutex<Vec<SearchRequest>>,
	last_raw: Mutex<Option<String>>,
}
impl CannedBackend {
	pub fn with_hits(hits: Vec<Hit>) -> Self {
		Self::from_outcome(Outcome::Hits(hits))
	}

	pub fn empty() -> Self {
		Self::with_hits(Vec::new())
	}

	/// Every request fails as if the index reported an error.
	pub fn failing(message: &str) -> Self {
		Self::from_outcome(Outcome::Failure(message.to_string()))
	}

	pub fn requests(&self) -> Vec<SearchRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn last_request(&self) -> Option<SearchRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).last().cloned()
	}

	fn from_outcome(outcome: Outcome) -> Self {
		Self { outcome, requests: Mutex::new(Vec::new()), last_raw: Mutex::new(None) }
	}
}

impl SearchBackend for CannedBackend {
	fn execute<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>> {
		*self.last_raw.lock().unwrap_or_else(|err| err.into_inner()) =
			Some(dsl::request_body(request).to_string());
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(request.clone());

		let result = match &self.outcome {
			Outcome::Hits(hits) =>
				Ok(SearchResponse { total: Some(hits.len() as u64), hits: hits.clone() }),
			Outcome::Failure(message) =>
				Err(Error::Index { status: Some(500), message: message.clone() }),
		};

		Box::pin(async move { result })
	}

	fn last_raw_request(&self) -> Option<String> {
		self.last_raw.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
