mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Files, Index, Indices, Search, Service};

use std::{
	fs,
	path::{Path, PathBuf},
};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	finish(cfg)
}

/// Parses a config held in memory, reporting parse failures against `<inline>`.
pub fn from_toml(raw: &str) -> Result<Config> {
	let cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: PathBuf::from("<inline>"), source: err })?;

	finish(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.index.url.trim().is_empty() {
		return Err(Error::Validation { message: "index.url must be non-empty.".to_string() });
	}
	if cfg.index.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "index.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.index.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("index.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.index.username.is_none() && cfg.index.password.is_some() {
		return Err(Error::Validation {
			message: "index.password requires index.username.".to_string(),
		});
	}

	for (label, value) in [
		("indices.contact", &cfg.indices.contact),
		("indices.mission", &cfg.indices.mission),
		("indices.reservation", &cfg.indices.reservation),
		("indices.chat_record", &cfg.indices.chat_record),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	for (label, value) in [
		("search.page_size", cfg.search.page_size),
		("search.contact_page_size", cfg.search.contact_page_size),
		("search.chat_page_size", cfg.search.chat_page_size),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if cfg.files.base_url.trim().is_empty() {
		return Err(Error::Validation { message: "files.base_url must be non-empty.".to_string() });
	}

	Ok(())
}

fn finish(mut cfg: Config) -> Result<Config> {
	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

fn normalize(cfg: &mut Config) {
	cfg.index.url = cfg.index.url.trim().trim_end_matches('/').to_string();
	cfg.files.base_url = cfg.files.base_url.trim().trim_end_matches('/').to_string();

	if cfg.index.username.as_deref().map(|name| name.trim().is_empty()).unwrap_or(false) {
		cfg.index.username = None;
	}
	if cfg.index.password.as_deref().map(|password| password.is_empty()).unwrap_or(false) {
		cfg.index.password = None;
	}
}
