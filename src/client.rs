//! Client facade tying options, token store, grant orchestration, admission queue,
//! and dispatch together.

pub mod oauth;

mod request;

pub use oauth::OAuthApi;

// self
use crate::{
	_prelude::*,
	auth::{MemoryTokenStore, TokenField, TokenStore, TokenUpdate},
	config::ClientOptions,
	error::ConfigError,
	grant::{GrantContext, TokenLifecycle},
	http::{HttpTokenRequester, TokenRequester},
	limit::RequestQueue,
	methods::{PropertyApi, TicketApi, UnitApi, UserApi, UtilisationPeriodApi},
	obs::RequestMetrics,
	redirect::{BrowsingSurface, RedirectHandler},
	rest::{ApiResponse, HttpVerb, RequestPayload, dispatch::Dispatcher},
};

/// Typed client over the property-management REST API.
///
/// One client owns one admission queue, one HTTP connection pool, the shared token
/// store, and the singleflight rotation state; clone-free sharing happens by borrowing
/// the client (the resource APIs and [`OAuthApi`] hold `&RestClient`).
pub struct RestClient {
	options: ClientOptions,
	store: Arc<dyn TokenStore>,
	requester: Arc<dyn TokenRequester>,
	lifecycle: TokenLifecycle,
	dispatcher: Dispatcher,
	metrics: RequestMetrics,
	surface: Option<Arc<dyn BrowsingSurface>>,
	redirect_handler: Option<Arc<dyn RedirectHandler>>,
}
impl RestClient {
	/// Builds a client with default collaborators.
	pub fn new(options: ClientOptions) -> Result<Self> {
		Self::builder().build(options)
	}

	/// Starts a builder for injecting a store, requester, or redirect plumbing.
	pub fn builder() -> RestClientBuilder {
		RestClientBuilder::default()
	}

	/// The immutable options this client was built from.
	pub fn options(&self) -> &ClientOptions {
		&self.options
	}

	/// Shared token store.
	pub fn token_store(&self) -> &dyn TokenStore {
		self.store.as_ref()
	}

	/// Always-on request counters.
	pub fn metrics(&self) -> &RequestMetrics {
		&self.metrics
	}

	/// OAuth2 helper surface (authorize URLs, explicit exchanges).
	pub fn oauth(&self) -> OAuthApi<'_> {
		OAuthApi::new(self)
	}

	/// Property endpoints.
	pub fn properties(&self) -> PropertyApi<'_> {
		PropertyApi::new(self)
	}

	/// Unit endpoints.
	pub fn units(&self) -> UnitApi<'_> {
		UnitApi::new(self)
	}

	/// User endpoints.
	pub fn users(&self) -> UserApi<'_> {
		UserApi::new(self)
	}

	/// Utilisation period endpoints.
	pub fn utilisation_periods(&self) -> UtilisationPeriodApi<'_> {
		UtilisationPeriodApi::new(self)
	}

	/// Ticket endpoints.
	pub fn tickets(&self) -> TicketApi<'_> {
		TicketApi::new(self)
	}

	/// `GET` returning the parsed body.
	pub async fn get(&self, api_method: &str, payload: RequestPayload) -> Result<serde_json::Value> {
		self.request(HttpVerb::Get, api_method, payload).await
	}

	/// `GET` returning the status and parsed body pair.
	pub async fn get_raw(&self, api_method: &str, payload: RequestPayload) -> Result<ApiResponse> {
		self.request_raw(HttpVerb::Get, api_method, payload).await
	}

	/// `POST` returning the parsed body.
	pub async fn post(
		&self,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<serde_json::Value> {
		self.request(HttpVerb::Post, api_method, payload).await
	}

	/// `PUT` returning the parsed body.
	pub async fn put(&self, api_method: &str, payload: RequestPayload) -> Result<serde_json::Value> {
		self.request(HttpVerb::Put, api_method, payload).await
	}

	/// `PATCH` returning the parsed body.
	pub async fn patch(
		&self,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<serde_json::Value> {
		self.request(HttpVerb::Patch, api_method, payload).await
	}

	/// `DELETE` returning the parsed body.
	pub async fn delete(
		&self,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<serde_json::Value> {
		self.request(HttpVerb::Delete, api_method, payload).await
	}

	pub(crate) fn grant_context(&self) -> GrantContext<'_> {
		GrantContext {
			store: self.store.as_ref(),
			requester: self.requester.as_ref(),
			options: &self.options,
			surface: self.surface.as_deref(),
			redirect_handler: self.redirect_handler.as_deref(),
		}
	}
}
impl Debug for RestClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClient")
			.field("options", &self.options)
			.field("has_surface", &self.surface.is_some())
			.field("has_redirect_handler", &self.redirect_handler.is_some())
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Builder for [`RestClient`] collaborator injection.
#[derive(Default)]
pub struct RestClientBuilder {
	store: Option<Arc<dyn TokenStore>>,
	requester: Option<Arc<dyn TokenRequester>>,
	surface: Option<Arc<dyn BrowsingSurface>>,
	redirect_handler: Option<Arc<dyn RedirectHandler>>,
	http: Option<ReqwestClient>,
}
impl RestClientBuilder {
	/// Uses the given token store instead of a fresh in-memory one.
	pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Uses the given token requester instead of the reqwest-backed default.
	pub fn token_requester(mut self, requester: Arc<dyn TokenRequester>) -> Self {
		self.requester = Some(requester);

		self
	}

	/// Attaches a browsing surface; this marks the execution context as browser-like,
	/// which drops the `user-agent` header and enables the implicit grant.
	pub fn browsing_surface(mut self, surface: Arc<dyn BrowsingSurface>) -> Self {
		self.surface = Some(surface);

		self
	}

	/// Attaches a sink that receives authorization code redirect URLs.
	pub fn redirect_handler(mut self, handler: Arc<dyn RedirectHandler>) -> Self {
		self.redirect_handler = Some(handler);

		self
	}

	/// Uses the given reqwest client for both API and token traffic.
	pub fn http_client(mut self, http: ReqwestClient) -> Self {
		self.http = Some(http);

		self
	}

	/// Validates options and assembles the client.
	pub fn build(self, options: ClientOptions) -> Result<RestClient> {
		options.validate_base_urls()?;

		let store_seeded = self.store.as_ref().is_some_and(|store| {
			store.has_access_token() || store.get(TokenField::RefreshToken).is_some()
		});

		if !options.has_credential_source() && !store_seeded {
			return Err(ConfigError::MissingCredentials.into());
		}

		let http = match self.http {
			Some(http) => http,
			None => ReqwestClient::builder()
				.build()
				.map_err(|source| ConfigError::HttpClientBuild { source })?,
		};
		let requester = match self.requester {
			Some(requester) => requester,
			None => Arc::new(HttpTokenRequester::with_client(
				http.clone(),
				options.oauth_token_url(),
			)),
		};
		let store = self.store.unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
		let mut seed = TokenUpdate::new();

		if let Some(token) = &options.access_token {
			seed = seed.access_token(token);
		}
		if let Some(token) = &options.refresh_token {
			seed = seed.refresh_token(token);
		}

		store.set(seed);

		let queue = RequestQueue::new(
			options.queue_reservoir,
			options.queue_refill_interval,
			options.queue_concurrency,
		);
		let dispatcher =
			Dispatcher::new(http, queue, options.api_url.clone(), self.surface.is_some());

		Ok(RestClient {
			options,
			store,
			requester,
			lifecycle: TokenLifecycle::new(),
			dispatcher,
			metrics: RequestMetrics::default(),
			surface: self.surface,
			redirect_handler: self.redirect_handler,
		})
	}
}
impl Debug for RestClientBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RestClientBuilder")
			.field("store", &self.store.is_some())
			.field("requester", &self.requester.is_some())
			.field("surface", &self.surface.is_some())
			.field("redirect_handler", &self.redirect_handler.is_some())
			.field("http", &self.http.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn construction_requires_a_credential_source() {
		let options = ClientOptions::builder().build();

		assert_eq!(
			RestClient::new(options).expect_err("No credential source was supplied.").to_string(),
			"Missing required \"client_id\" or \"access_token\" parameter.",
		);
	}

	#[test]
	fn construction_accepts_a_pre_seeded_store() {
		let store = Arc::new(MemoryTokenStore::new());

		store.set(TokenUpdate::new().access_token("seeded"));

		let client = RestClient::builder()
			.token_store(store)
			.build(ClientOptions::builder().build())
			.expect("A seeded store should satisfy the credential check.");

		assert_eq!(client.token_store().access_token().as_deref(), Some("seeded"));
	}

	#[test]
	fn construction_seeds_the_store_from_the_options() {
		let options = test_options(|builder| {
			builder.client_id("cid").access_token("at0").refresh_token("rt0")
		});
		let client = RestClient::new(options)
			.expect("Options with a client id should satisfy the credential check.");

		assert_eq!(client.token_store().access_token().as_deref(), Some("at0"));
		assert_eq!(client.token_store().get(TokenField::RefreshToken).as_deref(), Some("rt0"));
	}

	#[test]
	fn construction_rejects_an_invalid_api_url() {
		let options =
			test_options(|builder| builder.client_id("cid").api_url("ftp://api.propwise.io"));

		assert!(matches!(
			RestClient::new(options),
			Err(Error::Config(ConfigError::UnsupportedScheme { which: "api_url", .. })),
		));
	}
}
