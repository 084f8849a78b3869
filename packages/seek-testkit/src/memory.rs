use std::{cmp::Ordering, sync::Mutex};

use serde_json::{Map, Value};

use crate::{Document, evaluate};
use seek_index::{BoxFuture, Result, SearchBackend, dsl};
use seek_query::{Hit, SearchRequest, SearchResponse, Sort, SortOrder};

const DEFAULT_WINDOW: u32 = 10;

/// An index held in memory that actually evaluates the submitted query tree.
#[derive(Default)]
pub struct MemoryIndex {
	documents: Vec<Document>,
	last_raw: Mutex<Option<String>>,
}
impl MemoryIndex {
	pub fn new(documents: Vec<Document>) -> Self {
		Self { documents, ..Default::default() }
	}

	/// Matches, ranks, windows and projects documents of `request.index`.
	pub fn run(&self, request: &SearchRequest) -> SearchResponse {
		let mut scored = self
			.documents
			.iter()
			.filter(|doc| doc.index == request.index)
			.filter_map(|doc| evaluate(&request.query, doc).map(|score| (doc, score)))
			.collect::<Vec<_>>();

		match request.sort.as_ref() {
			Some(sort) if !sort.fields().is_empty() =>
				scored.sort_by(|(a, _), (b, _)| compare_by_sort(sort, a, b)),
			_ => scored.sort_by(|(_, a), (_, b)| b.total_cmp(a)),
		}

		let total = scored.len() as u64;
		let hits = scored
			.into_iter()
			.skip(request.from as usize)
			.take(request.size.unwrap_or(DEFAULT_WINDOW) as usize)
			.map(|(doc, score)| Hit {
				index: doc.index.clone(),
				doc_type: doc.doc_type.clone(),
				id: doc.id.clone(),
				score: Some(score),
				source: project(&doc.source, &request.source),
			})
			.collect();

		SearchResponse { total: Some(total), hits }
	}
}

impl SearchBackend for MemoryIndex {
	fn execute<'a>(&'a self, request: &'a SearchRequest) -> BoxFuture<'a, Result<SearchResponse>> {
		let raw = dsl::request_body(request).to_string();

		*self.last_raw.lock().unwrap_or_else(|err| err.into_inner()) = Some(raw);

		let response = self.run(request);

		Box::pin(async move { Ok(response) })
	}

	fn last_raw_request(&self) -> Option<String> {
		self.last_raw.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}

fn project(source: &Map<String, Value>, fields: &[String]) -> Map<String, Value> {
	if fields.is_empty() {
		return source.clone();
	}

	source
		.iter()
		.filter(|(key, _)| fields.iter().any(|field| field == *key))
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect()
}

fn compare_by_sort(sort: &Sort, a: &Document, b: &Document) -> Ordering {
	for key in sort.fields() {
		let ordering = compare_values(a.source.get(&key.field), b.source.get(&key.field));
		let ordering = match key.order {
			SortOrder::Asc => ordering,
			SortOrder::Desc => ordering.reverse(),
		};

		if ordering != Ordering::Equal {
			return ordering;
		}
	}

	Ordering::Equal
}

// Missing values sort last in ascending order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(Some(Value::Number(a)), Some(Value::Number(b))) => {
			a.as_f64().unwrap_or_default().total_cmp(&b.as_f64().unwrap_or_default())
		},
		(Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		_ => Ordering::Equal,
	}
}
