use std::sync::Arc;

use seek_index::ElasticsearchClient;
use seek_service::{AssetKind, FileLinkResolver, LinkOptions, SeekService};

/// Builds file URLs as `{base_url}/{kind}/{path}?size={size}`.
pub struct UrlFiles {
	base_url: String,
}
impl UrlFiles {
	pub fn new(base_url: &str) -> Self {
		Self { base_url: base_url.trim_end_matches('/').to_string() }
	}
}
impl FileLinkResolver for UrlFiles {
	fn file_link(&self, path: &str, kind: AssetKind, options: LinkOptions) -> String {
		let path = path.trim_start_matches('/');

		format!("{}/{}/{path}?size={}", self.base_url, kind.as_str(), options.size)
	}
}

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SeekService>,
}
impl AppState {
	pub fn new(config: seek_config::Config) -> color_eyre::Result<Self> {
		let backend = ElasticsearchClient::new(&config.index)?;
		let files = UrlFiles::new(&config.files.base_url);
		let service = SeekService::new(config, Arc::new(backend), Arc::new(files));

		Ok(Self { service: Arc::new(service) })
	}
}
