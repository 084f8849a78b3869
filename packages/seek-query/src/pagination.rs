use crate::{Error, Result};

/// A 1-based page request.
///
/// Page 0 is accepted and treated exactly like page 1; both start at offset 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
	number: u32,
	size: u32,
}
impl Page {
	pub fn new(number: u32, size: u32) -> Result<Self> {
		if size == 0 {
			return Err(Error::InvalidPage {
				message: "page size must be greater than zero.".to_string(),
			});
		}

		Ok(Self { number, size })
	}

	pub fn offset(&self) -> u64 {
		u64::from(self.number.saturating_sub(1)) * u64::from(self.size)
	}

	pub fn limit(&self) -> u32 {
		self.size
	}
}
