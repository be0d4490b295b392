//! Utilisation-period endpoints.
//!
//! A utilisation period is the span during which a set of tenants occupies a unit; check-in and
//! check-out move users into and out of the period.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	methods,
	rest::RequestPayload,
};

/// Occupancy form of a utilisation period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilisationPeriodType {
	/// Occupied by renting tenants.
	Tenant,
	/// Occupied by the owner.
	Ownership,
	/// Currently unoccupied.
	Vacant,
}
impl UtilisationPeriodType {
	/// Wire value of the variant.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Tenant => "tenant",
			Self::Ownership => "ownership",
			Self::Vacant => "vacant",
		}
	}
}
impl Display for UtilisationPeriodType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A span of occupancy on a unit.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilisationPeriod {
	/// Platform identifier.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// First day of occupancy, ISO `YYYY-MM-DD`.
	#[serde(default)]
	pub start_date: String,
	/// Last day of occupancy; `None` for open-ended periods.
	#[serde(default)]
	pub end_date: Option<String>,
	/// Identifier in the owning organisation's upstream system.
	#[serde(default)]
	pub external_id: Option<String>,
	/// Occupancy form; absent on some legacy documents.
	#[serde(default, rename = "type")]
	pub period_type: Option<UtilisationPeriodType>,
	/// Tenant identifiers currently checked in.
	#[serde(default)]
	pub tenant_ids: Vec<String>,
	/// True when the period is managed by an external data connector.
	#[serde(default)]
	pub read_only: bool,
	/// Remaining platform attributes, including the `_embedded` documents.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for [`UtilisationPeriodApi::create`]; `startDate` is mandatory on the wire.
#[derive(Clone, Debug)]
pub struct CreateUtilisationPeriod {
	start_date: String,
	end_date: Option<String>,
	period_type: Option<UtilisationPeriodType>,
	extra: serde_json::Map<String, serde_json::Value>,
}
impl CreateUtilisationPeriod {
	/// Creates an open-ended period starting at `start_date` (ISO `YYYY-MM-DD`).
	pub fn new(start_date: impl Into<String>) -> Self {
		Self {
			start_date: start_date.into(),
			end_date: None,
			period_type: None,
			extra: serde_json::Map::new(),
		}
	}

	/// Closes the period at `end_date`.
	pub fn end_date(mut self, end_date: impl Into<String>) -> Self {
		self.end_date = Some(end_date.into());

		self
	}

	/// Sets the occupancy form.
	pub fn period_type(mut self, period_type: UtilisationPeriodType) -> Self {
		self.period_type = Some(period_type);

		self
	}

	/// Adds one additional wire field.
	pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	fn into_body(self) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("startDate".into(), self.start_date.into());

		if let Some(end_date) = self.end_date {
			body.insert("endDate".into(), end_date.into());
		}
		if let Some(period_type) = self.period_type {
			body.insert("type".into(), period_type.as_str().into());
		}

		methods::merge_extra(&mut body, self.extra);

		serde_json::Value::Object(body)
	}
}

/// Utilisation-period endpoints borrowed from a [`RestClient`].
#[derive(Debug)]
pub struct UtilisationPeriodApi<'a> {
	client: &'a RestClient,
}
impl<'a> UtilisationPeriodApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// `POST /v1/units/{unit_id}/utilisation-periods`.
	pub async fn create(
		&self,
		unit_id: &str,
		data: CreateUtilisationPeriod,
	) -> Result<UtilisationPeriod> {
		let body = self
			.client
			.post(
				&format!("/v1/units/{unit_id}/utilisation-periods"),
				RequestPayload::new().json(data.into_body()),
			)
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/utilisation-periods/{period_id}`.
	pub async fn get_by_id(&self, period_id: &str) -> Result<UtilisationPeriod> {
		let body = self
			.client
			.get(&format!("/v1/utilisation-periods/{period_id}"), RequestPayload::new())
			.await?;

		methods::decode(body)
	}

	/// `PATCH /v1/utilisation-periods/{period_id}` with a partial document.
	pub async fn update_by_id(
		&self,
		period_id: &str,
		data: serde_json::Value,
	) -> Result<UtilisationPeriod> {
		let body = self
			.client
			.patch(&format!("/v1/utilisation-periods/{period_id}"), RequestPayload::new().json(data))
			.await?;

		methods::decode(body)
	}

	/// `POST /v1/utilisation-periods/{period_id}/users`, then re-reads the period so the caller
	/// sees the updated tenant list.
	pub async fn check_in_user(&self, period_id: &str, email: &str) -> Result<UtilisationPeriod> {
		self.client
			.post(
				&format!("/v1/utilisation-periods/{period_id}/users"),
				RequestPayload::new().json(serde_json::json!({ "email": email })),
			)
			.await?;

		self.get_by_id(period_id).await
	}

	/// `DELETE /v1/utilisation-periods/{period_id}/users/{user_id}`.
	pub async fn check_out_user(&self, period_id: &str, user_id: &str) -> Result<()> {
		self.client
			.delete(
				&format!("/v1/utilisation-periods/{period_id}/users/{user_id}"),
				RequestPayload::new(),
			)
			.await?;

		Ok(())
	}
}
