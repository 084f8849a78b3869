use serde::{Deserialize, Serialize};

use crate::{Result, SECONDARY_TEXT_TIER, SeekService, Source};
use seek_query::{BoolQuery, Page, Query, SearchRequest, tiered};

const RESERVATION_SOURCE: &[&str] = &[
	"id",
	"cid",
	"crid",
	"psid",
	"title",
	"attendance",
	"projector",
	"video",
	"start",
	"start_timestamp",
	"end",
	"end_timestamp",
	"created",
	"status",
	"room_name",
	"work_name",
	"user_profile_path",
];

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConferenceSearchRequest {
	pub keywords: String,
	#[serde(default)]
	pub page: u32,
}

impl SeekService {
	/// Meeting-room reservations by title or organizer work name.
	pub async fn conference_search(&self, req: ConferenceSearchRequest) -> Result<Vec<Source>> {
		let [title_strict, title_loose] = tiered("title", &req.keywords, SECONDARY_TEXT_TIER)?;
		let [work_strict, work_loose] = tiered("work_name", &req.keywords, SECONDARY_TEXT_TIER)?;
		let text = BoolQuery::should([title_strict, title_loose, work_strict, work_loose]);
		let request =
			SearchRequest::new(&self.cfg.indices.reservation, Query::new(BoolQuery::must([text])))
				.with_source(RESERVATION_SOURCE)
				.with_page(Page::new(req.page, self.cfg.search.page_size)?);

		Ok(self.sources(&request).await)
	}
}
