pub mod chat;
pub mod company;
pub mod conference;
pub mod contact;
pub mod mission;
pub mod time_serde;

mod error;

pub use chat::{ChatOwnership, ChatScope, ChatSearchRequest, MessageType};
pub use company::CompanySearchRequest;
pub use conference::ConferenceSearchRequest;
pub use contact::{AdminSearchRequest, ContactSearchRequest};
pub use error::{Error, Result};
pub use mission::{
	MissionCalendarRequest, MissionSearchRequest, MissionSort, MissionStatus, MissionType,
	Visibility,
};

use std::sync::Arc;

use serde_json::{Map, Value};

use seek_config::Config;
use seek_index::SearchBackend;
use seek_query::{FieldValue, Hit, SearchRequest, Tier};

/// Projected `_source` fields of one hit.
pub type Source = Map<String, Value>;

pub(crate) const COMPANY_NAME_TIER: Tier = Tier::new(1_000.0, 100.0);
pub(crate) const PRIMARY_TEXT_TIER: Tier = Tier::new(100.0, 1.0);
pub(crate) const SECONDARY_TEXT_TIER: Tier = Tier::new(10.0, 1.0);

/// Turns a stored file identifier into a URL a client can fetch.
pub trait FileLinkResolver
where
	Self: Send + Sync,
{
	fn file_link(&self, path: &str, kind: AssetKind, options: LinkOptions) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
	/// A logo the company uploaded.
	CompanyLogo,
	/// The placeholder image used when nothing was uploaded.
	DefaultProfile,
}
impl AssetKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::CompanyLogo => "company_logo",
			Self::DefaultProfile => "default_profile",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkOptions {
	pub size: u32,
}

/// Identity of whoever issued the search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Caller {
	pub uuid: Option<String>,
	pub psid: Option<String>,
	pub cid: Option<i64>,
}
impl Caller {
	/// The caller's ids in `uuid, psid` order, skipping blanks.
	pub fn ids(&self) -> Vec<&str> {
		[self.uuid.as_deref(), self.psid.as_deref()]
			.into_iter()
			.flatten()
			.filter(|id| !id.trim().is_empty())
			.collect()
	}

	fn is(&self, hit: &Hit) -> bool {
		self.uuid.as_deref().is_some_and(|uuid| hit.field_equals("uuid", &FieldValue::from(uuid)))
	}
}

pub struct SeekService {
	pub cfg: Config,
	pub backend: Arc<dyn SearchBackend>,
	pub files: Arc<dyn FileLinkResolver>,
}
impl SeekService {
	pub fn new(
		cfg: Config,
		backend: Arc<dyn SearchBackend>,
		files: Arc<dyn FileLinkResolver>,
	) -> Self {
		Self { cfg, backend, files }
	}

	/// Serialized body of the last request sent to the index, for diagnostics.
	pub fn sniffer_result(&self) -> Option<String> {
		self.backend.last_raw_request()
	}

	/// Runs one request. Execution failures are logged and read as an empty hit list.
	pub(crate) async fn hits(&self, request: &SearchRequest) -> Vec<Hit> {
		tracing::debug!(
			index = %request.index,
			from = request.from,
			size = ?request.size,
			"Search request built."
		);

		match self.backend.execute(request).await {
			Ok(response) => response.hits,
			Err(err) => {
				tracing::warn!(index = %request.index, error = %err, "Search failed.");

				Vec::new()
			},
		}
	}

	pub(crate) async fn sources(&self, request: &SearchRequest) -> Vec<Source> {
		self.hits(request).await.into_iter().map(|hit| hit.source).collect()
	}
}

pub(crate) fn unknown(what: &str, raw: &str) -> Error {
	Error::InvalidRequest { message: format!("Unknown {what} {raw:?}.") }
}
