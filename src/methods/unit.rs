//! Unit endpoints.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	methods::{self, EntityList, ListQuery},
	rest::RequestPayload,
};

/// Tenure form of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
	/// Rented out to tenants.
	Rented,
	/// Occupied by its owner.
	Owned,
}
impl UnitType {
	/// Wire value of the variant.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Rented => "rented",
			Self::Owned => "owned",
		}
	}
}
impl Display for UnitType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A rentable unit inside a group.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
	/// Platform identifier.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Identifier in the owning organisation's upstream system.
	#[serde(default)]
	pub external_id: Option<String>,
	/// Tenure form; absent on some legacy documents.
	#[serde(default, rename = "type")]
	pub unit_type: Option<UnitType>,
	/// Floor area in square meters.
	#[serde(default)]
	pub size: Option<f64>,
	/// True when the unit is managed by an external data connector.
	#[serde(default)]
	pub read_only: bool,
	/// Remaining platform attributes.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for [`UnitApi::create`]; `name` and `type` are mandatory on the wire.
#[derive(Clone, Debug)]
pub struct CreateUnit {
	name: String,
	unit_type: UnitType,
	extra: serde_json::Map<String, serde_json::Value>,
}
impl CreateUnit {
	/// Creates the minimal valid payload.
	pub fn new(name: impl Into<String>, unit_type: UnitType) -> Self {
		Self { name: name.into(), unit_type, extra: serde_json::Map::new() }
	}

	/// Adds one additional wire field.
	pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	fn into_body(self) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("name".into(), self.name.into());
		body.insert("type".into(), self.unit_type.as_str().into());
		methods::merge_extra(&mut body, self.extra);

		serde_json::Value::Object(body)
	}
}

/// Unit endpoints borrowed from a [`RestClient`].
#[derive(Debug)]
pub struct UnitApi<'a> {
	client: &'a RestClient,
}
impl<'a> UnitApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// `POST /v1/groups/{group_id}/units`.
	pub async fn create(&self, group_id: &str, data: CreateUnit) -> Result<Unit> {
		let body = self
			.client
			.post(&format!("/v1/groups/{group_id}/units"), RequestPayload::new().json(data.into_body()))
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/units/{unit_id}`.
	pub async fn get_by_id(&self, unit_id: &str) -> Result<Unit> {
		let body = self.client.get(&format!("/v1/units/{unit_id}"), RequestPayload::new()).await?;

		methods::decode(body)
	}

	/// `PATCH /v1/units/{unit_id}` with a partial document.
	pub async fn update_by_id(&self, unit_id: &str, data: serde_json::Value) -> Result<Unit> {
		let body = self
			.client
			.patch(&format!("/v1/units/{unit_id}"), RequestPayload::new().json(data))
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/units` with pagination and filter.
	pub async fn list(&self, query: ListQuery) -> Result<EntityList<Unit>> {
		let body = self.client.get("/v1/units", query.into_payload()).await?;

		methods::decode(body)
	}
}
