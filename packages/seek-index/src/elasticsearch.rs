// std
use std::{sync::Mutex, time::Duration as StdDuration};

// crates.io
use reqwest::{
	Client,
	header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

use crate::{BoxFuture, Error, Result, SearchBackend, dsl, response};
use seek_query::{SearchRequest, SearchResponse};

/// HTTP adapter that posts requests to `{url}/{index}/_search`.
pub struct ElasticsearchClient {
	client: Client,
	base_url: String,
	headers: HeaderMap,
	username: Option<String>,
	password: Option<String>,
	last_request: Mutex<Option<String>>,
}
impl ElasticsearchClient {
	pub fn new(cfg: &seek_config::Index) -> Result<Self> {
		let client = Client::builder().timeout(StdDuration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			client,
			base_url: cfg.url.trim_end_matches('/').to_string(),
			headers: default_headers(&cfg.default_headers)?,
			username: cfg.username.clone(),
			password: cfg.password.clone(),
			last_request: Mutex::new(None),
		})
	}

	pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
		let raw = serde_json::to_string(&dsl::request_body(request))?;

		self.record(raw.clone());

		let url = format!("{}/{}/_search", self.base_url, request.index);
		let mut builder = self.client.post(url).headers(self.headers.clone()).body(raw);

		if let Some(username) = self.username.as_deref() {
			builder = builder.basic_auth(username, self.password.as_deref());
		}

		let res = builder.send().await?;
		let status = res.status();
		let json: Value = res.json().await?;

		if !status.is_success() {
			return Err(Error::Index {
				status: Some(status.as_u16()),
				message: json
					.get("error")
					.map(response::error_reason)
					.unwrap_or_else(|| format!("Index returned HTTP {status}.")),
			});
		}

		let parsed = response::parse_search_response(json)?;

		tracing::debug!(index = %request.index, hits = parsed.hits.len(), "Search executed.");

		Ok(parsed)
	}

	fn record(&self, raw: String) {
		let mut last = self.last_request.lock().unwrap_or_else(|err| err.into_inner());

		*last = Some(raw);
	}
}

impl SearchBackend for ElasticsearchClient {
	fn execute<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>> {
		Box::pin(self.search(request))
	}

	fn last_raw_request(&self) -> Option<String> {
		self.last_request.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

pub fn default_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
