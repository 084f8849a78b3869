use serde::{Deserialize, Serialize};

use crate::{COMPANY_NAME_TIER, Caller, Result, SECONDARY_TEXT_TIER, SeekService, Source};
use seek_query::{
	BoolQuery, Condition, Hit, Page, Query, QueryNode, SearchRequest, tiered, tiered_with,
};

const CONTACT_SOURCE: &[&str] = &[
	"id",
	"suid",
	"uuid",
	"cid",
	"status",
	"profile_id",
	"user_profile_path",
	"work_name",
	"logo_path",
	"logo_id",
	"name",
	"address",
	"company_name",
];
const ADMIN_SOURCE: &[&str] = &[
	"id",
	"psid",
	"suid",
	"uuid",
	"cid",
	"profile_id",
	"user_profile_path",
	"work_name",
	"p_name",
	"logo_path",
	"logo_id",
	"name",
	"address",
	"company_name",
];

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactSearchRequest {
	pub keywords: String,
	/// The company the caller belongs to; its own document gets the top tier.
	pub company_id: Option<i64>,
	pub page: u32,
	pub size: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdminSearchRequest {
	pub keywords: String,
	/// Restricts results to position holders of this company.
	pub cid: Option<i64>,
	pub page: u32,
}

impl SeekService {
	/// Companies and people ranked as: the caller's own company by name, any company by name,
	/// people by work title, then weak work-title matches.
	pub async fn contact_search(&self, req: ContactSearchRequest) -> Result<Vec<Hit>> {
		let keywords = req.keywords.as_str();
		let own_company = Condition::ids(
			req.company_id.map(|cid| format!("company_{cid}")),
			Some("company"),
		)?;
		let [company_strict, company_loose] =
			tiered_with("name", keywords, vec![QueryNode::from(own_company)], COMPANY_NAME_TIER)?;
		let [work_strict, work_loose] = tiered("work_name", keywords, SECONDARY_TEXT_TIER)?;
		let root = BoolQuery::should([company_strict, company_loose, work_strict, work_loose]);
		let page = Page::new(req.page, req.size.unwrap_or(self.cfg.search.contact_page_size))?;
		let request = SearchRequest::new(&self.cfg.indices.contact, Query::new(root))
			.with_source(CONTACT_SOURCE)
			.with_page(page);

		Ok(self.hits(&request).await)
	}

	/// People found by work title, optionally limited to one company's position holders. The
	/// caller never appears in their own results.
	pub async fn admin_search(
		&self,
		req: AdminSearchRequest,
		caller: &Caller,
	) -> Result<Vec<Source>> {
		let [work_strict, work_loose] = tiered("work_name", &req.keywords, SECONDARY_TEXT_TIER)?;
		let work = BoolQuery::should([work_strict, work_loose]);
		let root = match req.cid {
			Some(cid) => BoolQuery::must([
				QueryNode::from(Condition::term("cid", cid)?),
				Condition::exists("psid")?.into(),
				work.into(),
			]),
			None => work,
		};
		let page = Page::new(req.page, self.cfg.search.page_size)?;
		let request = SearchRequest::new(&self.cfg.indices.contact, Query::new(root))
			.with_source(ADMIN_SOURCE)
			.with_page(page);

		Ok(self
			.hits(&request)
			.await
			.into_iter()
			.filter(|hit| !caller.is(hit))
			.map(|hit| hit.source)
			.collect())
	}
}
