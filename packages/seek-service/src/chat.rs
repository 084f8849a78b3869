use std::{ops::Bound, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Caller, Error, Result, SeekService, unknown};
use seek_query::{
	BoolQuery, Condition, Fuzziness, Hit, Page, Query, QueryNode, SearchRequest,
	relevance::{FUZZY_MAX_EXPANSIONS, FUZZY_PREFIX_LENGTH},
};

const CHAT_SOURCE: &[&str] = &[
	"_id",
	"msg",
	"name",
	"msg_type",
	"owner",
	"owner_name",
	"owner_profile",
	"owner_profile_id",
	"time",
	"detail",
	"gid",
	"uid1",
	"uid2",
	"uid1_name",
	"uid2_name",
	"uid1_profile",
	"uid2_profile",
	"uid1_profile_id",
	"uid2_profile_id",
	"status",
];
const TEXT_FIELDS: [&str; 2] = ["msg", "name"];
const TIE_BREAKER: f64 = 0.3;
const MINIMUM_SHOULD_MATCH: &str = "30%";
/// System messages that only carry a user mention, stored HTML-escaped.
const MENTION_PATTERN: &str = "&lt;@USER|[a-z0-9]{1,32}*";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
	Text,
	Image,
	File,
	Post,
}
impl MessageType {
	pub fn code(self) -> i64 {
		match self {
			Self::Text => 1,
			Self::Image => 2,
			Self::File => 3,
			Self::Post => 4,
		}
	}
}
impl FromStr for MessageType {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"text" => Ok(Self::Text),
			"image" => Ok(Self::Image),
			"file" => Ok(Self::File),
			"post" => Ok(Self::Post),
			other => Err(unknown("message type", other)),
		}
	}
}

/// Whose messages a chat search returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatOwnership {
	/// Messages the caller sent.
	MyChannel,
	/// Messages everyone else sent.
	OthersChannel,
}
impl FromStr for ChatOwnership {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"mine" => Ok(Self::MyChannel),
			"others" => Ok(Self::OthersChannel),
			other => Err(unknown("chat ownership", other)),
		}
	}
}

/// Which conversations a chat search covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatScope {
	/// One group channel. Needs no caller identity.
	Group { gid: String },
	/// The direct conversation between the caller and `peer`.
	Direct { peer: String },
	/// Every direct conversation of the caller plus the listed groups.
	AllChannels { gids: Vec<String> },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatSearchRequest {
	pub keywords: String,
	pub scope: Option<ChatScope>,
	pub ownership: Option<ChatOwnership>,
	pub message_type: Option<MessageType>,
	/// Exclusive lower bound on the message time; ignored unless `end` is also set.
	#[serde(default, with = "crate::time_serde::option")]
	pub start: Option<OffsetDateTime>,
	/// Exclusive upper bound on the message time; ignored unless `start` is also set.
	#[serde(default, with = "crate::time_serde::option")]
	pub end: Option<OffsetDateTime>,
	#[serde(default)]
	pub page: u32,
	pub size: Option<u32>,
}

impl SeekService {
	/// Chat messages matching `keywords` inside the requested scope. A request with neither a
	/// group nor a caller identity, or with a time range ending before it starts, is rejected with
	/// an empty result and never reaches the index.
	pub async fn chat_search(&self, req: ChatSearchRequest, caller: &Caller) -> Result<Vec<Hit>> {
		if let (Some(start), Some(end)) = (req.start, req.end)
			&& start > end
		{
			tracing::debug!(%start, %end, "Chat search rejected: time range ends before it starts.");

			return Ok(Vec::new());
		}

		let Some(scope) = scope_filter(req.scope.as_ref(), caller)? else {
			tracing::debug!("Chat search rejected: no group and no caller identity.");

			return Ok(Vec::new());
		};
		let mut root = BoolQuery::must([
			keyword_filter(&req.keywords)?,
			BoolQuery::must_not([Condition::regexp("msg", MENTION_PATTERN)?]),
		]);

		if let Some(message_type) = req.message_type {
			root.push(Condition::term("msg_type", message_type.code())?);
		}
		if let Some(ownership) = req.ownership {
			let owned = Condition::terms("owner", caller.ids())?;

			match ownership {
				ChatOwnership::MyChannel => root.push(owned),
				ChatOwnership::OthersChannel => root.push(BoolQuery::must_not([owned])),
			}
		}
		if let (Some(start), Some(end)) = (req.start, req.end) {
			root.push(Condition::range(
				"time",
				Bound::Excluded(unix_millis(start)),
				Bound::Excluded(unix_millis(end)),
			)?);
		}

		root.push(scope);

		let page = Page::new(req.page, req.size.unwrap_or(self.cfg.search.chat_page_size))?;
		let request = SearchRequest::new(&self.cfg.indices.chat_record, Query::new(root))
			.with_source(CHAT_SOURCE)
			.with_page(page);

		Ok(self.hits(&request).await)
	}
}

/// Best-fields over message text and sender name, or a typo-tolerant match on either.
fn keyword_filter(keywords: &str) -> Result<BoolQuery> {
	let best_fields =
		Condition::best_fields(TEXT_FIELDS, keywords, TIE_BREAKER, MINIMUM_SHOULD_MATCH)?;
	let fuzzy = TEXT_FIELDS
		.into_iter()
		.map(|field| {
			Condition::fuzzy(
				field,
				keywords,
				Fuzziness::Auto,
				FUZZY_PREFIX_LENGTH,
				FUZZY_MAX_EXPANSIONS,
			)
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(BoolQuery::should([QueryNode::from(best_fields), BoolQuery::should(fuzzy).into()]))
}

/// The channel constraint, or `None` when the request cannot be scoped.
fn scope_filter(scope: Option<&ChatScope>, caller: &Caller) -> Result<Option<QueryNode>> {
	// Direct messages are stored with an empty gid, so a blank group is no group at all.
	if let Some(ChatScope::Group { gid }) = scope
		&& !gid.trim().is_empty()
	{
		return Ok(Some(Condition::term("gid", gid)?.into()));
	}

	let ids = caller.ids();
	let Some(me) = ids.first().copied() else {
		return Ok(None);
	};

	match scope {
		Some(ChatScope::Direct { peer }) => {
			let sent =
				BoolQuery::must([Condition::term("uid1", me)?, Condition::term("uid2", peer)?]);
			let received =
				BoolQuery::must([Condition::term("uid1", peer)?, Condition::term("uid2", me)?]);

			Ok(Some(BoolQuery::should([sent, received]).into()))
		},
		Some(ChatScope::AllChannels { gids }) => {
			let mut any = BoolQuery::should(Vec::<QueryNode>::new());

			let own_ids = caller.psid.iter().chain(caller.uuid.iter());

			for id in own_ids.filter(|id| !id.trim().is_empty()) {
				any.push(Condition::term("uid1", id)?);
				any.push(Condition::term("uid2", id)?);
			}

			any.push(Condition::terms("gid", gids)?);

			Ok(Some(any.into()))
		},
		Some(ChatScope::Group { .. }) | None => Ok(None),
	}
}

fn unix_millis(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}
