//! Ticket endpoints.

// self
use crate::{_prelude::*, client::RestClient, methods, rest::RequestPayload};

/// Workflow state of a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
	/// Resolved and closed.
	Closed,
	/// The assigned agent owes the next action.
	WaitingForAgent,
	/// The reporting customer owes the next action.
	WaitingForCustomer,
	/// An external party owes the next action.
	WaitingForExternal,
}
impl TicketStatus {
	/// Wire value of the variant.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Closed => "closed",
			Self::WaitingForAgent => "waiting-for-agent",
			Self::WaitingForCustomer => "waiting-for-customer",
			Self::WaitingForExternal => "waiting-for-external",
		}
	}
}
impl Display for TicketStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A service ticket.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
	/// Platform identifier.
	pub id: String,
	/// Short summary.
	#[serde(default)]
	pub title: String,
	/// Full problem description.
	#[serde(default)]
	pub description: String,
	/// Category identifier.
	#[serde(default)]
	pub category: String,
	/// Workflow state; absent only on malformed legacy documents.
	#[serde(default)]
	pub status: Option<TicketStatus>,
	/// Creation timestamp, ISO 8601.
	#[serde(default)]
	pub created_at: String,
	/// Timestamp of the last workflow-state change, ISO 8601.
	#[serde(default)]
	pub last_status_update: Option<String>,
	/// Remaining platform attributes, including the `_embedded` documents.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for [`TicketApi::create`]; `title`, `description`, `category`, and `inputChannel`
/// are mandatory on the wire.
#[derive(Clone, Debug)]
pub struct CreateTicket {
	title: String,
	description: String,
	category: String,
	input_channel: String,
	extra: serde_json::Map<String, serde_json::Value>,
}
impl CreateTicket {
	/// Creates the minimal valid payload.
	pub fn new(
		title: impl Into<String>,
		description: impl Into<String>,
		category: impl Into<String>,
		input_channel: impl Into<String>,
	) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			category: category.into(),
			input_channel: input_channel.into(),
			extra: serde_json::Map::new(),
		}
	}

	/// Adds one additional wire field.
	pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	fn into_body(self, utilisation_period_id: &str) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("category".into(), self.category.into());
		body.insert("description".into(), self.description.into());
		body.insert("inputChannel".into(), self.input_channel.into());
		body.insert("title".into(), self.title.into());
		body.insert("utilisationPeriod".into(), utilisation_period_id.into());
		methods::merge_extra(&mut body, self.extra);

		serde_json::Value::Object(body)
	}
}

/// Ticket endpoints borrowed from a [`RestClient`].
#[derive(Debug)]
pub struct TicketApi<'a> {
	client: &'a RestClient,
}
impl<'a> TicketApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// `POST /v1/users/{user_id}/tickets`, filed against a utilisation period.
	pub async fn create(
		&self,
		user_id: &str,
		utilisation_period_id: &str,
		data: CreateTicket,
	) -> Result<Ticket> {
		let body = self
			.client
			.post(
				&format!("/v1/users/{user_id}/tickets"),
				RequestPayload::new().json(data.into_body(utilisation_period_id)),
			)
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/tickets/{ticket_id}`.
	pub async fn get_by_id(&self, ticket_id: &str) -> Result<Ticket> {
		let body =
			self.client.get(&format!("/v1/tickets/{ticket_id}"), RequestPayload::new()).await?;

		methods::decode(body)
	}

	/// `PATCH /v1/tickets/{ticket_id}` moving the ticket to `status`.
	pub async fn update_status(&self, ticket_id: &str, status: TicketStatus) -> Result<Ticket> {
		let body = self
			.client
			.patch(
				&format!("/v1/tickets/{ticket_id}"),
				RequestPayload::new().json(serde_json::json!({ "status": status.as_str() })),
			)
			.await?;

		methods::decode(body)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn create_body_binds_the_utilisation_period() {
		let body = CreateTicket::new("Leaking tap", "Kitchen tap drips.", "cat-5", "app")
			.with("phoneNumber", "+49 761 0000".into())
			.into_body("up-1");

		assert_eq!(
			body,
			serde_json::json!({
				"category": "cat-5",
				"description": "Kitchen tap drips.",
				"inputChannel": "app",
				"title": "Leaking tap",
				"utilisationPeriod": "up-1",
				"phoneNumber": "+49 761 0000",
			}),
		);
	}

	#[test]
	fn status_round_trips_the_kebab_wire_form() {
		let ticket: Ticket = serde_json::from_value(serde_json::json!({
			"id": "t-1",
			"title": "Leaking tap",
			"status": "waiting-for-agent",
		}))
		.expect("A ticket document must deserialize.");

		assert_eq!(ticket.status, Some(TicketStatus::WaitingForAgent));
		assert_eq!(
			serde_json::to_value(TicketStatus::WaitingForExternal)
				.expect("A status variant must serialize."),
			serde_json::json!("waiting-for-external"),
		);
	}
}
