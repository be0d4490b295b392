//! User endpoints.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	methods::{self, EntityList, ListQuery},
	rest::RequestPayload,
};

/// A platform user account.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Platform identifier.
	pub id: String,
	/// Login name.
	#[serde(default)]
	pub username: String,
	/// Contact email address.
	#[serde(default)]
	pub email: String,
	/// True once the email address was confirmed.
	#[serde(default)]
	pub email_validated: bool,
	/// BCP 47 locale the user reads the platform in.
	#[serde(default)]
	pub locale: String,
	/// Identifier in the owning organisation's upstream system.
	#[serde(default)]
	pub external_id: Option<String>,
	/// Role identifiers granted to the account.
	#[serde(default)]
	pub roles: Vec<String>,
	/// True when the account is managed by an external data connector.
	#[serde(default)]
	pub read_only: bool,
	/// Remaining platform attributes.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

/// Payload for [`UserApi::create`]; `email` and `locale` are mandatory on the wire.
#[derive(Clone, Debug)]
pub struct CreateUser {
	email: String,
	locale: String,
	plain_password: Option<String>,
	extra: serde_json::Map<String, serde_json::Value>,
}
impl CreateUser {
	/// Creates the minimal valid payload; without a password the platform invites the user to
	/// pick one.
	pub fn new(email: impl Into<String>, locale: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			locale: locale.into(),
			plain_password: None,
			extra: serde_json::Map::new(),
		}
	}

	/// Sets an initial password.
	pub fn plain_password(mut self, plain_password: impl Into<String>) -> Self {
		self.plain_password = Some(plain_password.into());

		self
	}

	/// Adds one additional wire field.
	pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	fn into_body(self, username: &str) -> serde_json::Value {
		let mut body = serde_json::Map::new();

		body.insert("email".into(), self.email.into());
		body.insert("locale".into(), self.locale.into());
		body.insert("username".into(), username.into());

		if let Some(plain_password) = self.plain_password {
			body.insert("plainPassword".into(), plain_password.into());
		}

		methods::merge_extra(&mut body, self.extra);

		serde_json::Value::Object(body)
	}
}

/// User endpoints borrowed from a [`RestClient`].
#[derive(Debug)]
pub struct UserApi<'a> {
	client: &'a RestClient,
}
impl<'a> UserApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// `POST /v1/apps/{app_id}/users`.
	pub async fn create(&self, app_id: &str, username: &str, data: CreateUser) -> Result<User> {
		let body = self
			.client
			.post(
				&format!("/v1/apps/{app_id}/users"),
				RequestPayload::new().json(data.into_body(username)),
			)
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/me`, the user behind the current access token.
	pub async fn current(&self) -> Result<User> {
		let body = self.client.get("/v1/me", RequestPayload::new()).await?;

		methods::decode(body)
	}

	/// `GET /v1/users/{user_id}`.
	pub async fn get_by_id(&self, user_id: &str) -> Result<User> {
		let body = self.client.get(&format!("/v1/users/{user_id}"), RequestPayload::new()).await?;

		methods::decode(body)
	}

	/// `PATCH /v1/users/{user_id}` with a partial document.
	pub async fn update_by_id(&self, user_id: &str, data: serde_json::Value) -> Result<User> {
		let body = self
			.client
			.patch(&format!("/v1/users/{user_id}"), RequestPayload::new().json(data))
			.await?;

		methods::decode(body)
	}

	/// `GET /v1/users` with pagination and filter.
	pub async fn list(&self, query: ListQuery) -> Result<EntityList<User>> {
		let body = self.client.get("/v1/users", query.into_payload()).await?;

		methods::decode(body)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn create_body_injects_the_username() {
		let body = CreateUser::new("resident@example.org", "de_DE")
			.plain_password("hunter2")
			.with("receiveAdminNotifications", false.into())
			.into_body("resident-17");

		assert_eq!(
			body,
			serde_json::json!({
				"email": "resident@example.org",
				"locale": "de_DE",
				"username": "resident-17",
				"plainPassword": "hunter2",
				"receiveAdminNotifications": false,
			}),
		);
	}

	#[test]
	fn user_tolerates_sparse_documents() {
		let user: User = serde_json::from_value(serde_json::json!({
			"id": "u-1",
			"email": "resident@example.org",
			"tenantIds": { "org-1": "t-9" },
		}))
		.expect("A sparse user document must deserialize.");

		assert_eq!(user.email, "resident@example.org");
		assert!(user.roles.is_empty());
		assert!(user.extra.contains_key("tenantIds"));
	}
}
