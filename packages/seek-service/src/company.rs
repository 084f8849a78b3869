use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AssetKind, COMPANY_NAME_TIER, Caller, LinkOptions, Result, SeekService, Source};
use seek_query::{BoolQuery, FieldValue, Hit, Query, SearchRequest, tiered};

const COMPANY_SOURCE: &[&str] = &["cid", "logo_id", "logo_path", "name", "address"];
const COMPANY_DOC_TYPE: &str = "company";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanySearchRequest {
	pub keywords: String,
}

impl SeekService {
	/// Companies by name, excluding the caller's own, with `logo_path` rewritten to a URL.
	pub async fn company_search(
		&self,
		req: CompanySearchRequest,
		caller: &Caller,
	) -> Result<Vec<Source>> {
		let [strict, loose] = tiered("name", &req.keywords, COMPANY_NAME_TIER)?;
		let request = SearchRequest::new(
			&self.cfg.indices.contact,
			Query::new(BoolQuery::should([strict, loose])),
		)
		.with_source(COMPANY_SOURCE);

		Ok(self
			.hits(&request)
			.await
			.into_iter()
			.filter(|hit| hit.doc_type.as_deref() == Some(COMPANY_DOC_TYPE))
			.filter(|hit| !is_own_company(hit, caller))
			.map(|hit| self.with_logo_link(hit.source))
			.collect())
	}

	fn with_logo_link(&self, mut source: Source) -> Source {
		let (kind, size) = if is_set(source.get("logo_id")) {
			(AssetKind::CompanyLogo, self.cfg.files.company_logo_size)
		} else {
			(AssetKind::DefaultProfile, self.cfg.files.default_profile_size)
		};
		let path = source.get("logo_path").and_then(Value::as_str).unwrap_or_default();
		let link = self.files.file_link(path, kind, LinkOptions { size });

		source.insert("logo_path".to_string(), Value::String(link));

		source
	}
}

fn is_own_company(hit: &Hit, caller: &Caller) -> bool {
	caller.cid.is_some_and(|cid| hit.field_equals("cid", &FieldValue::Int(cid)))
}

// Absent, null, false, zero, "" and "0" all mean no custom logo was uploaded.
fn is_set(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(flag)) => *flag,
		Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
		Some(Value::String(text)) => !text.is_empty() && text != "0",
		Some(_) => true,
	}
}
