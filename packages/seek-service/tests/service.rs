use std::sync::{Arc, Mutex};

use serde_json::json;
use time::macros::datetime;

use seek_config::Config;
use seek_query::{BoolQuery, Condition, FieldValue, Occur, QueryNode};
use seek_service::{
	AdminSearchRequest, AssetKind, Caller, ChatOwnership, ChatScope, ChatSearchRequest,
	CompanySearchRequest, ContactSearchRequest, Error, FileLinkResolver, LinkOptions,
	MessageType, MissionCalendarRequest, MissionSearchRequest, MissionSort, MissionStatus,
	MissionType, SeekService, Visibility,
};
use seek_testkit::{CannedBackend, hit};

#[derive(Default)]
struct SpyFiles {
	calls: Mutex<Vec<(String, AssetKind, u32)>>,
}
impl SpyFiles {
	fn calls(&self) -> Vec<(String, AssetKind, u32)> {
		self.calls.lock().expect("files lock").clone()
	}
}
impl FileLinkResolver for SpyFiles {
	fn file_link(&self, path: &str, kind: AssetKind, options: LinkOptions) -> String {
		self.calls.lock().expect("files lock").push((path.to_string(), kind, options.size));

		format!("https://files.test/{}/{path}", kind.as_str())
	}
}

fn test_config() -> Config {
	seek_config::from_toml(
		r#"
[service]
log_level = "info"

[index]
url = "http://127.0.0.1:9200"
timeout_ms = 1000

[files]
base_url = "https://files.test"
"#,
	)
	.expect("Failed to parse test config.")
}

fn service_with(backend: Arc<CannedBackend>) -> (SeekService, Arc<SpyFiles>) {
	let files = Arc::new(SpyFiles::default());
	let service = SeekService::new(test_config(), backend, files.clone());

	(service, files)
}

fn caller() -> Caller {
	Caller { uuid: Some("u1".to_string()), psid: Some("p1".to_string()), cid: Some(7) }
}

fn child_bool(node: &BoolQuery, index: usize) -> &BoolQuery {
	node.children()[index].as_bool().expect("Expected a bool child.")
}

fn boosts(node: &BoolQuery) -> Vec<f32> {
	node.children().iter().filter_map(QueryNode::as_bool).map(BoolQuery::boost).collect()
}

#[tokio::test]
async fn contact_search_builds_four_tier_ladder() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = ContactSearchRequest {
		keywords: "acme".to_string(),
		company_id: None,
		page: 1,
		size: Some(10),
	};

	service.contact_search(req).await.expect("contact search");

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();

	assert_eq!(request.index, "contact");
	assert_eq!(request.from, 0);
	assert_eq!(request.size, Some(10));
	assert_eq!(root.occur(), Occur::Should);
	assert_eq!(root.len(), 4);
	assert_eq!(boosts(root), vec![1_000.0, 100.0, 10.0, 1.0]);
	assert!(matches!(
		child_bool(root, 0).children()[0].as_condition(),
		Some(Condition::Ids { ids, doc_type: Some(doc_type) })
			if ids.is_empty() && doc_type == "company"
	));
}

#[tokio::test]
async fn contact_search_pins_own_company_and_pages() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());

	for page in [0, 1, 3] {
		let req = ContactSearchRequest {
			keywords: "acme".to_string(),
			company_id: Some(7),
			page,
			size: None,
		};

		service.contact_search(req).await.expect("contact search");
	}

	let requests = backend.requests();

	assert_eq!(requests.iter().map(|r| r.from).collect::<Vec<_>>(), vec![0, 0, 200]);
	assert!(requests.iter().all(|r| r.size == Some(100)));
	assert!(matches!(
		child_bool(requests[0].query.root(), 0).children()[0].as_condition(),
		Some(Condition::Ids { ids, .. }) if *ids == vec!["company_7".to_string()]
	));
}

#[tokio::test]
async fn execution_failure_yields_empty_result_and_keeps_sniffer() {
	let backend = Arc::new(CannedBackend::failing("all shards failed"));
	let (service, _) = service_with(backend.clone());
	let req = ContactSearchRequest { keywords: "acme".to_string(), page: 1, ..Default::default() };
	let hits = service.contact_search(req).await.expect("failures are swallowed");

	assert!(hits.is_empty());
	assert_eq!(backend.request_count(), 1);

	let raw = service.sniffer_result().expect("sniffer payload");

	assert!(raw.contains("\"fuzzy\""));
	assert!(raw.contains("\"boost\":1000.0"));
}

#[tokio::test]
async fn invalid_page_size_fails_fast() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req =
		ContactSearchRequest { keywords: "acme".to_string(), size: Some(0), ..Default::default() };
	let err = service.contact_search(req).await.expect_err("zero page size");

	assert!(matches!(err, Error::InvalidQuery(_)));
	assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn admin_search_scopes_to_company_and_skips_caller() {
	let backend = Arc::new(CannedBackend::with_hits(vec![
		hit("contact", Some("user"), "user_1", json!({ "uuid": "u1", "work_name": "admin" })),
		hit("contact", Some("user"), "user_2", json!({ "uuid": "u2", "work_name": "admin" })),
	]));
	let (service, _) = service_with(backend.clone());
	let req = AdminSearchRequest { keywords: "admin".to_string(), cid: Some(7), page: 2 };
	let results = service.admin_search(req, &caller()).await.expect("admin search");

	assert_eq!(results.len(), 1);
	assert_eq!(results[0]["uuid"], json!("u2"));

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();

	assert_eq!(request.from, 11);
	assert_eq!(request.size, Some(11));
	assert_eq!(root.occur(), Occur::Must);
	assert!(matches!(
		root.children()[0].as_condition(),
		Some(Condition::Term { field, value: FieldValue::Int(7) }) if field == "cid"
	));
	assert!(matches!(root.children()[1].as_condition(), Some(Condition::Exists { .. })));
	assert_eq!(boosts(child_bool(root, 2)), vec![10.0, 1.0]);
}

#[tokio::test]
async fn company_search_resolves_logos_and_skips_own_company() {
	let company = |cid: i64, logo_id: &str, logo_path: &str| {
		json!({ "cid": cid, "logo_id": logo_id, "logo_path": logo_path })
	};
	let backend = Arc::new(CannedBackend::with_hits(vec![
		hit("contact", Some("company"), "company_1", company(1, "", "d.png")),
		hit("contact", Some("company"), "company_2", company(2, "9f", "l.png")),
		hit("contact", Some("company"), "company_7", company(7, "", "o.png")),
		hit("contact", Some("user"), "user_5", company(1, "", "u.png")),
	]));
	let (service, files) = service_with(backend.clone());
	let req = CompanySearchRequest { keywords: "acme".to_string() };
	let results = service.company_search(req, &caller()).await.expect("company search");

	assert_eq!(results.len(), 2);
	assert_eq!(results[0]["logo_path"], json!("https://files.test/default_profile/d.png"));
	assert_eq!(results[1]["logo_path"], json!("https://files.test/company_logo/l.png"));
	assert_eq!(
		files.calls(),
		vec![
			("d.png".to_string(), AssetKind::DefaultProfile, 3),
			("l.png".to_string(), AssetKind::CompanyLogo, 3),
		]
	);

	let request = backend.last_request().expect("request recorded");

	assert_eq!(request.size, None);
	assert_eq!(boosts(request.query.root()), vec![1_000.0, 100.0]);
}

#[tokio::test]
async fn calendar_todo_column_includes_reset() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = MissionCalendarRequest {
		status: MissionStatus::Todo,
		mission_type: MissionType::Code(2),
		visibility: Visibility::Mine,
		page: 1,
	};

	service.mission_calendar(req, &caller()).await.expect("calendar");

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();
	let status = child_bool(root, 0);

	assert_eq!(request.index, "mission");
	assert_eq!(status.occur(), Occur::Should);
	assert!(matches!(status.children()[0].as_condition(), Some(Condition::Terms { .. })));
	assert!(matches!(status.children()[1].as_condition(), Some(Condition::Term { .. })));
	assert!(matches!(
		child_bool(root, 1).children()[0].as_condition(),
		Some(Condition::Term { field, .. }) if field == "publisher_psid"
	));
	assert!(matches!(
		child_bool(root, 2).children()[0].as_condition(),
		Some(Condition::Term { field, value: FieldValue::Int(2) }) if field == "type"
	));
	assert_eq!(request.sort.expect("sorted").fields()[0].field, "created");
}

#[tokio::test]
async fn calendar_without_psid_never_queries() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = MissionCalendarRequest {
		status: MissionStatus::Doing,
		mission_type: MissionType::Any,
		visibility: Visibility::All,
		page: 1,
	};
	let results = service.mission_calendar(req, &Caller::default()).await.expect("calendar");

	assert!(results.is_empty());
	assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn missions_by_id_excludes_deleted() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());

	service.missions_by_id(&[4, 5]).await.expect("missions by id");

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();

	assert_eq!(request.size, None);
	assert_eq!(child_bool(root, 0).occur(), Occur::Must);
	assert_eq!(child_bool(root, 1).occur(), Occur::MustNot);
	assert!(matches!(
		child_bool(root, 1).children()[0].as_condition(),
		Some(Condition::Term { value: FieldValue::Int(8), .. })
	));
}

#[tokio::test]
async fn mission_search_drops_deleted_hits() {
	let backend = Arc::new(CannedBackend::with_hits(vec![
		hit("mission", Some("mission"), "1", json!({ "id": 1, "status": 3 })),
		hit("mission", Some("mission"), "2", json!({ "id": 2, "status": 8 })),
		hit("mission", Some("mission"), "3", json!({ "id": 3, "status": "8" })),
	]));
	let (service, _) = service_with(backend.clone());
	let req = MissionSearchRequest {
		keywords: "launch".to_string(),
		statuses: vec![MissionStatus::Doing, MissionStatus::Done],
		page: 0,
		sort: MissionSort::ActualEnd,
	};
	let results = service.mission_search(req, &caller()).await.expect("mission search");

	assert_eq!(results.len(), 1);
	assert_eq!(results[0]["id"], json!(1));

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();
	let participation = child_bool(root, 2);

	assert_eq!(boosts(child_bool(root, 0)), vec![100.0, 1.0, 100.0, 1.0, 10.0, 1.0]);
	assert_eq!(participation.len(), 5);
	assert!(matches!(
		participation.children()[4].as_condition(),
		Some(Condition::Term { field, .. }) if field == "publisher_psid"
	));
	assert_eq!(request.sort.expect("sorted").fields()[0].field, "actual_end_timestamp");
}

#[tokio::test]
async fn chat_search_without_scope_or_identity_is_rejected() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = ChatSearchRequest { keywords: "lunch".to_string(), ..Default::default() };
	let hits = service.chat_search(req, &Caller::default()).await.expect("chat search");

	assert!(hits.is_empty());
	assert_eq!(backend.request_count(), 0);
	assert_eq!(service.sniffer_result(), None);
}

#[tokio::test]
async fn chat_search_across_channels_applies_filters() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = ChatSearchRequest {
		keywords: "lunch".to_string(),
		scope: Some(ChatScope::AllChannels { gids: vec!["g1".to_string(), "g2".to_string()] }),
		ownership: Some(ChatOwnership::OthersChannel),
		message_type: Some(MessageType::Image),
		start: Some(datetime!(2016-10-18 00:00 UTC)),
		end: Some(datetime!(2016-10-19 00:00 UTC)),
		page: 1,
		size: None,
	};

	service.chat_search(req, &caller()).await.expect("chat search");

	let request = backend.last_request().expect("request recorded");
	let root = request.query.root();

	assert_eq!(request.index, "chat_record");
	assert_eq!(request.size, Some(200));
	assert_eq!(root.len(), 6);
	assert_eq!(child_bool(root, 1).occur(), Occur::MustNot);
	assert!(matches!(
		root.children()[2].as_condition(),
		Some(Condition::Term { value: FieldValue::Int(2), .. })
	));
	assert!(matches!(
		child_bool(root, 3).children()[0].as_condition(),
		Some(Condition::Terms { values, .. })
			if *values == vec![FieldValue::from("u1"), FieldValue::from("p1")]
	));
	assert!(matches!(root.children()[4].as_condition(), Some(Condition::Range { .. })));

	let scope = child_bool(root, 5);

	assert_eq!(scope.occur(), Occur::Should);
	assert_eq!(scope.len(), 5);
	assert!(matches!(
		scope.children()[4].as_condition(),
		Some(Condition::Terms { field, values }) if field == "gid" && values.len() == 2
	));
}

#[tokio::test]
async fn chat_reversed_time_range_yields_nothing() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = ChatSearchRequest {
		keywords: "lunch".to_string(),
		scope: Some(ChatScope::Group { gid: "g1".to_string() }),
		start: Some(datetime!(2016-10-19 00:00 UTC)),
		end: Some(datetime!(2016-10-18 00:00 UTC)),
		..Default::default()
	};
	let hits = service.chat_search(req, &Caller::default()).await.expect("soft rejection");

	assert!(hits.is_empty());
	assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn chat_time_range_needs_both_ends() {
	let backend = Arc::new(CannedBackend::empty());
	let (service, _) = service_with(backend.clone());
	let req = ChatSearchRequest {
		keywords: "lunch".to_string(),
		scope: Some(ChatScope::Group { gid: "g1".to_string() }),
		start: Some(datetime!(2016-10-18 00:00 UTC)),
		..Default::default()
	};

	service.chat_search(req, &Caller::default()).await.expect("chat search");

	let request = backend.last_request().expect("request recorded");

	let conditions = request.query.root().conditions();

	assert!(conditions.iter().all(|condition| !matches!(condition, Condition::Range { .. })));
	assert!(service.sniffer_result().expect("sniffer").contains("\"gid\":\"g1\""));
}
