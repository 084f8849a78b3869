pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid query: {0}")]
	InvalidQuery(#[from] seek_query::Error),
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
}
