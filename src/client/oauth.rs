//! Explicit OAuth2 operations: authorize URLs, code exchange, and manual refresh.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	client::RestClient,
	grant::{GrantStep, authorization_code, refresh_token},
};

const STATE_LEN: usize = 16;

/// OAuth2 helper surface borrowed from a [`RestClient`].
///
/// The exchanges here run outside the retry loop; both save the resulting token into
/// the client's store so subsequent API calls pick it up.
#[derive(Debug)]
pub struct OAuthApi<'a> {
	client: &'a RestClient,
}
impl<'a> OAuthApi<'a> {
	pub(crate) fn new(client: &'a RestClient) -> Self {
		Self { client }
	}

	/// Builds the authorize-endpoint URL for the authorization code flow.
	///
	/// `state` overrides the configured state parameter; pass
	/// [`generate_state`](Self::generate_state) output to get CSRF protection without
	/// configuring one up front.
	pub fn authorization_code_uri(&self, state: Option<&str>) -> Result<Url> {
		let mut options = self.client.options().clone();

		if let Some(state) = state {
			options.state = Some(state.to_owned());
		}

		authorization_code::get_redirect_url(&options)
	}

	/// Produces a pseudo-random state string for the authorize redirect.
	pub fn generate_state(&self) -> String {
		rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
	}

	/// Exchanges an authorization code and saves the token into the store.
	pub async fn exchange_authorization_code(&self, code: &str) -> Result<OAuthToken> {
		let token = authorization_code::request_token(
			self.client.requester.as_ref(),
			self.client.options(),
			Some(code),
		)
		.await?;

		self.client.lifecycle.commit(
			self.client.token_store(),
			GrantStep::AuthorizationCode,
			&token,
		);

		Ok(token)
	}

	/// Exchanges the given refresh token and saves the result into the store.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<OAuthToken> {
		let mut options = self.client.options().clone();

		options.refresh_token = Some(refresh_token.to_owned());

		let token =
			refresh_token::request_token(self.client.requester.as_ref(), &options).await?;

		self.client.lifecycle.commit(self.client.token_store(), GrantStep::RefreshToken, &token);

		Ok(token)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn client() -> RestClient {
		RestClient::new(test_options(|builder| {
			builder.client_id("cid").redirect_uri("https://app.example/callback")
		}))
		.expect("A client id should satisfy the credential check.")
	}

	#[test]
	fn authorization_code_uri_carries_the_override_state() {
		let client = client();
		let url = client
			.oauth()
			.authorization_code_uri(Some("st4te"))
			.expect("A client id and redirect URI should produce an authorize URL.");

		assert_eq!(
			url.as_str(),
			"https://accounts.propwise.io/oauth/authorize?client_id=cid&redirect_uri=https%3A%2F%2Fapp.example%2Fcallback&response_type=code&scope=user%3Aprofile&state=st4te",
		);
	}

	#[test]
	fn generated_state_is_sixteen_alphanumeric_characters() {
		let client = client();
		let state = client.oauth().generate_state();

		assert_eq!(state.len(), 16);
		assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[tokio::test]
	async fn code_exchange_saves_the_token_into_the_store() {
		let requester = Arc::new(RecordingRequester::returning(
			OAuthToken::new("fresh").with_refresh_token("rotated"),
		));
		let client = RestClient::builder()
			.token_requester(requester.clone())
			.build(test_options(|builder| {
				builder.client_id("cid").redirect_uri("https://app.example/callback")
			}))
			.expect("A client id should satisfy the credential check.");
		let token = client
			.oauth()
			.exchange_authorization_code("c0de")
			.await
			.expect("The recording requester should accept the exchange.");

		assert_eq!(token.access_token(), "fresh");
		assert_eq!(requester.single_call()["code"], "c0de");
		assert_eq!(client.token_store().access_token().as_deref(), Some("fresh"));
		assert_eq!(
			client.token_store().get(crate::auth::TokenField::RefreshToken).as_deref(),
			Some("rotated"),
		);
	}
}
