use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub index: Index,
	#[serde(default)]
	pub indices: Indices,
	#[serde(default)]
	pub search: Search,
	pub files: Files,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Connection to the search index.
#[derive(Debug, Deserialize)]
pub struct Index {
	pub url: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	pub username: Option<String>,
	pub password: Option<String>,
}

/// Names of the indices each use case targets.
#[derive(Debug, Deserialize)]
pub struct Indices {
	#[serde(default = "default_contact_index")]
	pub contact: String,
	#[serde(default = "default_mission_index")]
	pub mission: String,
	#[serde(default = "default_reservation_index")]
	pub reservation: String,
	#[serde(default = "default_chat_record_index")]
	pub chat_record: String,
}
impl Default for Indices {
	fn default() -> Self {
		Self {
			contact: default_contact_index(),
			mission: default_mission_index(),
			reservation: default_reservation_index(),
			chat_record: default_chat_record_index(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Fixed page size for admin, mission and reservation searches.
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Default page size for contact searches when the caller gives none.
	#[serde(default = "default_contact_page_size")]
	pub contact_page_size: u32,
	/// Default page size for chat transcript searches when the caller gives none.
	#[serde(default = "default_chat_page_size")]
	pub chat_page_size: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			page_size: default_page_size(),
			contact_page_size: default_contact_page_size(),
			chat_page_size: default_chat_page_size(),
		}
	}
}

/// Where stored logo and image identifiers resolve to.
#[derive(Debug, Deserialize)]
pub struct Files {
	pub base_url: String,
	#[serde(default = "default_image_size")]
	pub company_logo_size: u32,
	#[serde(default = "default_image_size")]
	pub default_profile_size: u32,
}

fn default_contact_index() -> String {
	"contact".to_string()
}

fn default_mission_index() -> String {
	"mission".to_string()
}

fn default_reservation_index() -> String {
	"reservation".to_string()
}

fn default_chat_record_index() -> String {
	"chat_record".to_string()
}

fn default_page_size() -> u32 {
	11
}

fn default_contact_page_size() -> u32 {
	100
}

fn default_chat_page_size() -> u32 {
	200
}

fn default_image_size() -> u32 {
	3
}
