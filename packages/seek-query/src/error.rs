pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid condition on field '{field}': {message}")]
	InvalidCondition { field: String, message: String },
	#[error("Invalid boost {boost}: boost must be a finite number greater than zero.")]
	InvalidBoost { boost: f32 },
	#[error("Invalid pagination: {message}")]
	InvalidPage { message: String },
}
