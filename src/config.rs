//! Client options, platform defaults, and their builder.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Production REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.propwise.io";
/// Production OAuth2 base URL.
pub const DEFAULT_OAUTH_URL: &str = "https://accounts.propwise.io";
/// Scope requested when the caller does not override it.
pub const DEFAULT_SCOPE: &str = "user:profile";
/// Base back-off interval between request retries.
pub const REQUEST_BACK_OFF_INTERVAL: Duration = Duration::from_millis(200);
/// Retries allowed on top of the initial attempt.
pub const REQUEST_MAX_RETRIES: u32 = 50;
/// Rate-limiter reservoir capacity.
pub const QUEUE_RESERVOIR: u32 = 30;
/// Interval between single-permit reservoir refills.
pub const QUEUE_RESERVOIR_REFILL_INTERVAL: Duration = Duration::from_millis(166);
/// Reservoir level above which an idle refill timer tops up once and stops.
pub const QUEUE_IDLE_FLOOR: u32 = 10;
/// User agent sent with non-browser requests.
pub const USER_AGENT: &str = concat!("Propwise Rust SDK REST Client/", env!("CARGO_PKG_VERSION"));

/// Immutable client configuration.
///
/// Construct through [`ClientOptions::builder`] or [`ClientOptionsBuilder::from_env`]; base URLs
/// are validated when the client is built, not here.
#[derive(Clone)]
pub struct ClientOptions {
	pub(crate) api_url: String,
	pub(crate) oauth_url: String,
	pub(crate) client_id: Option<String>,
	pub(crate) client_secret: Option<String>,
	pub(crate) username: Option<String>,
	pub(crate) password: Option<String>,
	pub(crate) access_token: Option<String>,
	pub(crate) refresh_token: Option<String>,
	pub(crate) authorization_code: Option<String>,
	pub(crate) redirect_uri: Option<String>,
	pub(crate) scope: Option<String>,
	pub(crate) state: Option<String>,
	pub(crate) implicit: bool,
	pub(crate) request_back_off_interval: Duration,
	pub(crate) request_max_retries: u32,
	pub(crate) queue_reservoir: u32,
	pub(crate) queue_refill_interval: Duration,
	pub(crate) queue_concurrency: Option<usize>,
}
impl ClientOptions {
	/// Starts a builder seeded with the platform defaults.
	pub fn builder() -> ClientOptionsBuilder {
		ClientOptionsBuilder::new()
	}

	/// REST API base URL.
	pub fn api_url(&self) -> &str {
		&self.api_url
	}

	/// OAuth2 base URL.
	pub fn oauth_url(&self) -> &str {
		&self.oauth_url
	}

	/// OAuth2 client identifier, if configured.
	pub fn client_id(&self) -> Option<&str> {
		self.client_id.as_deref()
	}

	/// Requested scope, if configured.
	pub fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}

	/// Opaque state forwarded to redirect flows, if configured.
	pub fn state(&self) -> Option<&str> {
		self.state.as_deref()
	}

	/// Token endpoint derived from [`Self::oauth_url`].
	pub fn oauth_token_url(&self) -> String {
		format!("{}/oauth/token", self.oauth_url)
	}

	/// Authorization endpoint derived from [`Self::oauth_url`].
	pub fn oauth_authorize_url(&self) -> String {
		format!("{}/oauth/authorize", self.oauth_url)
	}

	/// True when at least one credential source is configured.
	///
	/// A client id unlocks the interactive grants; pre-issued token material alone is enough to
	/// call the API until it expires.
	pub fn has_credential_source(&self) -> bool {
		self.client_id.is_some() || self.access_token.is_some() || self.refresh_token.is_some()
	}

	pub(crate) fn validate_base_urls(&self) -> Result<(), ConfigError> {
		validate_base_url("api_url", &self.api_url)?;
		validate_base_url("oauth_url", &self.oauth_url)?;

		Ok(())
	}
}
impl Default for ClientOptions {
	fn default() -> Self {
		Self::builder().build()
	}
}
impl Debug for ClientOptions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientOptions")
			.field("api_url", &self.api_url)
			.field("oauth_url", &self.oauth_url)
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
			.field("username", &self.username)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("authorization_code", &self.authorization_code.as_ref().map(|_| "<redacted>"))
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.field("state", &self.state)
			.field("implicit", &self.implicit)
			.field("request_back_off_interval", &self.request_back_off_interval)
			.field("request_max_retries", &self.request_max_retries)
			.field("queue_reservoir", &self.queue_reservoir)
			.field("queue_refill_interval", &self.queue_refill_interval)
			.field("queue_concurrency", &self.queue_concurrency)
			.finish()
	}
}

fn validate_base_url(which: &'static str, value: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
		which,
		value: value.to_owned(),
		source,
	})?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { which, value: value.to_owned() });
	}

	Ok(url)
}

/// Builder for [`ClientOptions`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientOptionsBuilder {
	api_url: Option<String>,
	oauth_url: Option<String>,
	client_id: Option<String>,
	client_secret: Option<String>,
	username: Option<String>,
	password: Option<String>,
	access_token: Option<String>,
	refresh_token: Option<String>,
	authorization_code: Option<String>,
	redirect_uri: Option<String>,
	scope: Option<String>,
	state: Option<String>,
	implicit: bool,
	request_back_off_interval: Option<Duration>,
	request_max_retries: Option<u32>,
	queue_reservoir: Option<u32>,
	queue_refill_interval: Option<Duration>,
	queue_concurrency: Option<usize>,
}
impl ClientOptionsBuilder {
	/// Creates an empty builder; unset fields fall back to the platform defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a builder seeded from the `PROPWISE_*` environment.
	///
	/// Recognized variables: `PROPWISE_API_URL`, `PROPWISE_OAUTH_URL`, `PROPWISE_CLIENT_ID`,
	/// `PROPWISE_CLIENT_SECRET`, `PROPWISE_USERNAME`, `PROPWISE_PASSWORD`. Explicit setter calls
	/// win over the environment.
	pub fn from_env() -> Self {
		Self {
			api_url: env::var("PROPWISE_API_URL").ok(),
			oauth_url: env::var("PROPWISE_OAUTH_URL").ok(),
			client_id: env::var("PROPWISE_CLIENT_ID").ok(),
			client_secret: env::var("PROPWISE_CLIENT_SECRET").ok(),
			username: env::var("PROPWISE_USERNAME").ok(),
			password: env::var("PROPWISE_PASSWORD").ok(),
			..Self::default()
		}
	}

	/// Sets the REST API base URL.
	pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
		self.api_url = Some(api_url.into());

		self
	}

	/// Sets the OAuth2 base URL.
	pub fn oauth_url(mut self, oauth_url: impl Into<String>) -> Self {
		self.oauth_url = Some(oauth_url.into());

		self
	}

	/// Sets the OAuth2 client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the OAuth2 client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the resource-owner username for the password grant.
	pub fn username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the resource-owner password for the password grant.
	pub fn password(mut self, password: impl Into<String>) -> Self {
		self.password = Some(password.into());

		self
	}

	/// Seeds the client with a pre-issued access token.
	pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
		self.access_token = Some(access_token.into());

		self
	}

	/// Seeds the client with a pre-issued refresh token.
	pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Sets an authorization code to exchange directly.
	pub fn authorization_code(mut self, authorization_code: impl Into<String>) -> Self {
		self.authorization_code = Some(authorization_code.into());

		self
	}

	/// Sets the redirect URI for the redirect-style grants.
	pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(redirect_uri.into());

		self
	}

	/// Overrides the requested scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Sets the opaque state forwarded to redirect flows.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Enables the implicit grant on browser-like surfaces.
	pub fn implicit(mut self, implicit: bool) -> Self {
		self.implicit = implicit;

		self
	}

	/// Overrides the base back-off interval between retries.
	pub fn request_back_off_interval(mut self, interval: Duration) -> Self {
		self.request_back_off_interval = Some(interval);

		self
	}

	/// Overrides the retry budget.
	pub fn request_max_retries(mut self, retries: u32) -> Self {
		self.request_max_retries = Some(retries);

		self
	}

	/// Overrides the rate-limiter reservoir capacity.
	pub fn queue_reservoir(mut self, reservoir: u32) -> Self {
		self.queue_reservoir = Some(reservoir);

		self
	}

	/// Overrides the reservoir refill interval.
	pub fn queue_refill_interval(mut self, interval: Duration) -> Self {
		self.queue_refill_interval = Some(interval);

		self
	}

	/// Caps the number of requests in flight at once; unset means unbounded.
	pub fn queue_concurrency(mut self, concurrency: usize) -> Self {
		self.queue_concurrency = Some(concurrency);

		self
	}

	/// Consumes the builder, filling every unset field with its default.
	pub fn build(self) -> ClientOptions {
		ClientOptions {
			api_url: self.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
			oauth_url: self.oauth_url.unwrap_or_else(|| DEFAULT_OAUTH_URL.to_owned()),
			client_id: self.client_id,
			client_secret: self.client_secret,
			username: self.username,
			password: self.password,
			access_token: self.access_token,
			refresh_token: self.refresh_token,
			authorization_code: self.authorization_code,
			redirect_uri: self.redirect_uri,
			scope: self.scope.or_else(|| Some(DEFAULT_SCOPE.to_owned())),
			state: self.state,
			implicit: self.implicit,
			request_back_off_interval: self
				.request_back_off_interval
				.unwrap_or(REQUEST_BACK_OFF_INTERVAL),
			request_max_retries: self.request_max_retries.unwrap_or(REQUEST_MAX_RETRIES),
			queue_reservoir: self.queue_reservoir.unwrap_or(QUEUE_RESERVOIR),
			queue_refill_interval: self
				.queue_refill_interval
				.unwrap_or(QUEUE_RESERVOIR_REFILL_INTERVAL),
			queue_concurrency: self.queue_concurrency,
		}
	}
}
