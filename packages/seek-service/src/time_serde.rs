//! RFC 3339 timestamps on request types.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};

pub fn parse(raw: &str) -> Result<OffsetDateTime> {
	OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|err| Error::InvalidRequest {
		message: format!("Timestamp {raw:?} is not RFC 3339: {err}."),
	})
}

pub mod option {
	use serde::{Deserialize as _, Deserializer, Serializer};
	use time::{OffsetDateTime, format_description::well_known::Rfc3339};

	pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match value {
			Some(value) => serializer
				.serialize_str(&value.format(&Rfc3339).map_err(serde::ser::Error::custom)?),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Option::<String>::deserialize(deserializer)?
			.map(|raw| OffsetDateTime::parse(&raw, &Rfc3339).map_err(serde::de::Error::custom))
			.transpose()
	}
}
