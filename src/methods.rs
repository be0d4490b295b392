//! Typed resource catalog over the verb helpers.
//!
//! Each resource API is a thin borrow of the client; the retry loop, rate limiting, and token
//! handling all happen underneath. Entity structs carry the stable fields and funnel the long
//! tail of platform attributes into a flattened `extra` map.

pub mod property;
pub mod ticket;
pub mod unit;
pub mod user;
pub mod utilisation_period;

pub use property::PropertyApi;
pub use ticket::TicketApi;
pub use unit::UnitApi;
pub use user::UserApi;
pub use utilisation_period::UtilisationPeriodApi;

// self
use crate::{_prelude::*, error::ApiError, rest::RequestPayload};

/// HAL-style list envelope `{_embedded: {items: […]}, total}` flattened for Rust callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityList<T> {
	/// The page of entities.
	pub items: Vec<T>,
	/// Total number of entities matching the query, across all pages.
	pub total: u64,
}
impl<'de, T> Deserialize<'de> for EntityList<T>
where
	T: Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		struct Wire<T> {
			#[serde(rename = "_embedded")]
			embedded: Embedded<T>,
			#[serde(default)]
			total: u64,
		}
		#[derive(Deserialize)]
		struct Embedded<T> {
			items: Vec<T>,
		}

		let wire = Wire::<T>::deserialize(deserializer)?;

		Ok(Self { items: wire.embedded.items, total: wire.total })
	}
}

/// Pagination and filtering for the list endpoints.
///
/// The defaults mirror the platform's: first page, unbounded page size (`limit = -1`), no
/// filter. Filters travel as one JSON-encoded `filter` query parameter.
#[derive(Clone, Debug)]
pub struct ListQuery {
	page: u32,
	limit: i64,
	filter: Option<serde_json::Value>,
}
impl ListQuery {
	/// Creates a query for the first, unbounded page.
	pub fn new() -> Self {
		Self::default()
	}

	/// Selects a page; pages count from `1`.
	pub fn page(mut self, page: u32) -> Self {
		self.page = page;

		self
	}

	/// Caps the page size; `-1` requests every entity.
	pub fn limit(mut self, limit: i64) -> Self {
		self.limit = limit;

		self
	}

	/// Attaches a filter document.
	pub fn filter(mut self, filter: serde_json::Value) -> Self {
		self.filter = Some(filter);

		self
	}

	pub(crate) fn into_payload(self) -> RequestPayload {
		let mut payload = RequestPayload::new()
			.query("limit", self.limit.to_string())
			.query("page", self.page.to_string());

		if let Some(filter) = self.filter {
			payload = payload.query("filter", filter.to_string());
		}

		payload
	}
}
impl Default for ListQuery {
	fn default() -> Self {
		Self { page: 1, limit: -1, filter: None }
	}
}

// Decodes a parsed response body into a typed entity, keeping the JSON path on failure.
pub(crate) fn decode<T>(body: serde_json::Value) -> Result<T>
where
	T: serde::de::DeserializeOwned,
{
	Ok(serde_path_to_error::deserialize(body).map_err(|source| ApiError::Decode { source })?)
}

// Folds builder-collected extras into a body map without clobbering the named fields.
pub(crate) fn merge_extra(
	body: &mut serde_json::Map<String, serde_json::Value>,
	extra: serde_json::Map<String, serde_json::Value>,
) {
	for (key, value) in extra {
		body.entry(key).or_insert(value);
	}
}
