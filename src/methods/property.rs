//! Property endpoints.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	methods::{self, EntityList, ListQuery},
	rest::RequestPayload,
};

/// A managed property.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
	/// Platform identifier.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Short label shown in listings.
	#[serde(default)]
	pub label: String,
	/// Identifier in the owning organisation's upstream system.
	#[serde(default)]
	pub external_id: Option<String>,
	/// IANA timezone the property operates in.
	#[serde(default)]
	pub timezone: String,
	/// True when the property is managed by an external data connector.
	#[serde(default)]
	pub read_only: bool,
	/// Remaining platform attributes.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for [`PropertyApi::create`]; `name` and `timezone` are mandatory on the wire.
#[derive(Clone, Debug)]
pub struct CreateProperty {
	name: String,
	timezone: String,
	extra: serde_json::Map<String, serde_json::Value>,
}
impl CreateProperty {
	/// Creates the minimal valid payload.
	pub fn new(name: impl Into<String>, timezone: impl Into<String>) -> Self {
		Self { name: name.into(), timezone: timezone.into(), extra: serde_json::Map::new() }
	}

	/// Adds one additional wire field.
	pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	fn into_body(self) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("name".into(), self.name.into());
		body.insert("timezone".into(), self.timezone.into());
		methods::merge_extra(&mut body, self.extra);

		serde_json::Value::Object(body)
	}
}

/// Property endpoints borrowed from a [`RestClient`].
#[derive(Debug)]
pub struct PropertyApi<'a> {
	client: &'a RestClient,
}
impl<'a> PropertyApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// `POST /v1/apps/{app_id}/properties`.
	pub async fn create(&self, app_id: &str, data: CreateProperty) -> Result<Property> {
		let body = self
			.client
			.post(
				&format!("/v1/apps/{app_id}/properties"),
				RequestPayload::new().json(data.into_body()),
			)
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/properties/{property_id}`.
	pub async fn get_by_id(&self, property_id: &str) -> Result<Property> {
		let body =
			self.client.get(&format!("/v1/properties/{property_id}"), RequestPayload::new()).await?;

		methods::decode(body)
	}

	/// `PATCH /v1/properties/{property_id}` with a partial document.
	pub async fn update_by_id(
		&self,
		property_id: &str,
		data: serde_json::Value,
	) -> Result<Property> {
		let body = self
			.client
			.patch(&format!("/v1/properties/{property_id}"), RequestPayload::new().json(data))
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/properties` with pagination and filter.
	pub async fn list(&self, query: ListQuery) -> Result<EntityList<Property>> {
		let body = self.client.get("/v1/properties", query.into_payload()).await?;

		methods::decode(body)
	}
}
