use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
	Caller, Error, PRIMARY_TEXT_TIER, Result, SECONDARY_TEXT_TIER, SeekService, Source, unknown,
};
use seek_query::{
	BoolQuery, Condition, FieldValue, Page, Query, QueryNode, SearchRequest, Sort, SortOrder,
	list_contains, tiered,
};

const MISSION_SOURCE: &[&str] = &[
	"id",
	"name",
	"description",
	"publisher_psid",
	"publisher_name",
	"psids",
	"level",
	"status",
	"type",
	"created",
	"start",
	"start_timestamp",
	"end",
	"actual_start_timestamp",
	"actual_end",
	"actual_end_timestamp",
];
const CALENDAR_EXTRA_SOURCE: &[&str] = &["created_timestamp"];

/// Mission lifecycle states as stored in the `status` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
	Todo,
	Pending,
	Doing,
	Done,
	Archived,
	Paused,
	Reset,
	Deleted,
}
impl MissionStatus {
	pub fn code(self) -> i64 {
		match self {
			Self::Todo => 1,
			Self::Pending => 2,
			Self::Doing => 3,
			Self::Done => 4,
			Self::Archived => 5,
			Self::Paused => 6,
			Self::Reset => 7,
			Self::Deleted => 8,
		}
	}

	/// Statuses a calendar request for `self` lists. Only the five calendar columns list
	/// anything; to-do also picks up pending missions and, separately, reset ones.
	fn calendar_set(self) -> Vec<Self> {
		match self {
			Self::Todo => vec![Self::Todo, Self::Pending],
			Self::Doing | Self::Done | Self::Archived | Self::Paused => vec![self],
			Self::Pending | Self::Reset | Self::Deleted => Vec::new(),
		}
	}
}
impl FromStr for MissionStatus {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"todo" => Ok(Self::Todo),
			"pending" => Ok(Self::Pending),
			"doing" => Ok(Self::Doing),
			"done" => Ok(Self::Done),
			"archived" => Ok(Self::Archived),
			"paused" => Ok(Self::Paused),
			"reset" => Ok(Self::Reset),
			"deleted" => Ok(Self::Deleted),
			other => Err(unknown("mission status", other)),
		}
	}
}

/// Mission type filter; `Any` disables it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
	#[default]
	Any,
	Code(i64),
}
impl FromStr for MissionType {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		let raw = raw.trim();

		if raw == "any" {
			return Ok(Self::Any);
		}

		raw.parse().map(Self::Code).map_err(|_| Error::InvalidRequest {
			message: format!("Mission type must be \"any\" or an integer code, got {raw:?}."),
		})
	}
}

/// Which missions of the caller a calendar lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
	/// Published by the caller or assigned to them.
	#[default]
	All,
	/// Published by the caller.
	Mine,
	/// Assigned to the caller by someone else.
	Others,
}
impl FromStr for Visibility {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"all" => Ok(Self::All),
			"mine" => Ok(Self::Mine),
			"others" => Ok(Self::Others),
			other => Err(unknown("visibility", other)),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionSort {
	#[default]
	Created,
	ActualEnd,
}
impl MissionSort {
	pub fn field(self) -> &'static str {
		match self {
			Self::Created => "created",
			Self::ActualEnd => "actual_end_timestamp",
		}
	}
}
impl FromStr for MissionSort {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"created" => Ok(Self::Created),
			"actual_end" => Ok(Self::ActualEnd),
			other => Err(unknown("mission sort", other)),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionCalendarRequest {
	pub status: MissionStatus,
	#[serde(default)]
	pub mission_type: MissionType,
	#[serde(default)]
	pub visibility: Visibility,
	#[serde(default)]
	pub page: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionSearchRequest {
	pub keywords: String,
	pub statuses: Vec<MissionStatus>,
	#[serde(default)]
	pub page: u32,
	#[serde(default)]
	pub sort: MissionSort,
}

impl SeekService {
	/// One calendar column of the caller's missions, newest first.
	pub async fn mission_calendar(
		&self,
		req: MissionCalendarRequest,
		caller: &Caller,
	) -> Result<Vec<Source>> {
		let Some(psid) = position_id(caller) else {
			tracing::debug!("Mission calendar requested without a caller psid.");

			return Ok(Vec::new());
		};
		let assigned = BoolQuery::must([list_contains("psids", psid)?]);
		let published = BoolQuery::must([Condition::term("publisher_psid", psid)?]);
		let ownership = match req.visibility {
			Visibility::All => BoolQuery::should([assigned, published]),
			Visibility::Mine => published,
			Visibility::Others => assigned,
		};
		let mut root = BoolQuery::must([calendar_status_filter(req.status)?, ownership]);

		if let MissionType::Code(code) = req.mission_type {
			root.push(BoolQuery::must([Condition::term("type", code)?]));
		}

		let mut source = MISSION_SOURCE.to_vec();

		source.extend_from_slice(CALENDAR_EXTRA_SOURCE);

		let request = SearchRequest::new(&self.cfg.indices.mission, Query::new(root))
			.with_source(&source)
			.with_sort(Sort::by("created", SortOrder::Desc))
			.with_page(Page::new(req.page, self.cfg.search.page_size)?);

		Ok(self.sources(&request).await)
	}

	/// Missions among `ids` that are not deleted.
	pub async fn missions_by_id(&self, ids: &[i64]) -> Result<Vec<Source>> {
		let root = BoolQuery::must([
			BoolQuery::must([Condition::terms("id", ids.iter().copied())?]),
			BoolQuery::must_not([Condition::term("status", MissionStatus::Deleted.code())?]),
		]);
		let request = SearchRequest::new(&self.cfg.indices.mission, Query::new(root))
			.with_source(MISSION_SOURCE);

		Ok(self.sources(&request).await)
	}

	/// Full-text search over the caller's missions by name, description and publisher.
	pub async fn mission_search(
		&self,
		req: MissionSearchRequest,
		caller: &Caller,
	) -> Result<Vec<Source>> {
		let Some(psid) = position_id(caller) else {
			tracing::debug!("Mission search requested without a caller psid.");

			return Ok(Vec::new());
		};
		let keywords = req.keywords.as_str();
		let mut text = BoolQuery::should(Vec::<QueryNode>::new());

		for (field, tier) in [
			("name", PRIMARY_TEXT_TIER),
			("description", PRIMARY_TEXT_TIER),
			("publisher_name", SECONDARY_TEXT_TIER),
		] {
			let [strict, loose] = tiered(field, keywords, tier)?;

			text.push(strict);
			text.push(loose);
		}

		let statuses = Condition::terms("status", req.statuses.iter().map(|status| status.code()))?;
		let mut participation = list_contains("psids", psid)?;

		participation.push(Condition::term("publisher_psid", psid)?);

		let root = BoolQuery::must([QueryNode::from(text), statuses.into(), participation.into()]);
		let request = SearchRequest::new(&self.cfg.indices.mission, Query::new(root))
			.with_source(MISSION_SOURCE)
			.with_sort(Sort::by(req.sort.field(), SortOrder::Desc))
			.with_page(Page::new(req.page, self.cfg.search.page_size)?);
		let deleted = FieldValue::Int(MissionStatus::Deleted.code());

		Ok(self
			.hits(&request)
			.await
			.into_iter()
			.filter(|hit| !hit.field_equals("status", &deleted))
			.map(|hit| hit.source)
			.collect())
	}
}

fn position_id(caller: &Caller) -> Option<&str> {
	caller.psid.as_deref().filter(|psid| !psid.trim().is_empty())
}

/// `must[terms(status, set)]`, or for to-do
/// `should[terms(status, {todo, pending}), term(status, reset)]`.
fn calendar_status_filter(status: MissionStatus) -> Result<BoolQuery> {
	let codes = status.calendar_set().into_iter().map(MissionStatus::code);
	let set = Condition::terms("status", codes)?;

	if status == MissionStatus::Todo {
		let reset = Condition::term("status", MissionStatus::Reset.code())?;

		return Ok(BoolQuery::should([set, reset]));
	}

	Ok(BoolQuery::must([set]))
}
