use std::sync::Arc;

use clap::Parser;
use serde_json::json;

use seek::{Args, Command, dispatch, state::UrlFiles};
use seek_query::{Condition, Occur};
use seek_service::{MissionStatus, SeekService};
use seek_testkit::{CannedBackend, hit};

fn service(backend: Arc<CannedBackend>) -> SeekService {
	let cfg = seek_config::from_toml(
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
	.expect("Failed to parse test config.");

	SeekService::new(cfg, backend, Arc::new(UrlFiles::new("https://files.test")))
}

#[test]
fn parses_mission_statuses_and_caller() {
	let args = Args::try_parse_from([
		"seek",
		"-c",
		"seek.toml",
		"mission",
		"launch",
		"--status",
		"doing,done",
		"--psid",
		"p1",
	])
	.expect("valid args");

	assert_eq!(args.caller().psid.as_deref(), Some("p1"));
	assert!(matches!(
		args.command,
		Command::Mission { ref statuses, .. }
			if *statuses == vec![MissionStatus::Doing, MissionStatus::Done]
	));
}

#[test]
fn rejects_unknown_status_and_bad_timestamps() {
	let unknown_status = ["seek", "-c", "x.toml", "calendar", "--status", "later"];
	let bad_timestamp = ["seek", "-c", "x.toml", "chat", "hi", "--start", "yesterday"];

	assert!(Args::try_parse_from(unknown_status).is_err());
	assert!(Args::try_parse_from(bad_timestamp).is_err());
}

#[tokio::test]
async fn chat_command_scopes_to_group() {
	let backend = Arc::new(CannedBackend::empty());
	let service = service(backend.clone());
	let args = Args::try_parse_from(["seek", "-c", "x.toml", "chat", "lunch", "--gid", "g1"])
		.expect("valid args");
	let caller = args.caller();
	let results = dispatch(&service, args.command, &caller).await.expect("chat search");

	assert_eq!(results, json!([]));

	let request = backend.last_request().expect("request recorded");
	let scope = request.query.root().children().last().and_then(|node| node.as_condition());

	assert!(matches!(scope, Some(Condition::Term { field, .. }) if field == "gid"));
}

#[tokio::test]
async fn company_command_prints_resolved_logos() {
	let backend = Arc::new(CannedBackend::with_hits(vec![hit(
		"contact",
		Some("company"),
		"company_2",
		json!({ "cid": 2, "logo_id": "9f", "logo_path": "l.png", "name": "Acme" }),
	)]));
	let service = service(backend.clone());
	let args = Args::try_parse_from(["seek", "-c", "x.toml", "--cid", "7", "company", "acme"])
		.expect("valid args");
	let caller = args.caller();
	let results = dispatch(&service, args.command, &caller).await.expect("company search");

	assert_eq!(results[0]["logo_path"], json!("https://files.test/company_logo/l.png?size=3"));
	assert_eq!(backend.last_request().expect("request").query.root().occur(), Occur::Should);
}
