//! Transport seam for OAuth token exchanges.
//!
//! Grant strategies never talk HTTP themselves; they hand a parameter map to a
//! [`TokenRequester`]. The SDK ships [`HttpTokenRequester`], a reqwest-backed implementation
//! posting to the platform token endpoint, and tests substitute recording doubles through the
//! same trait.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::OAuthToken, config::USER_AGENT, error::TokenError};

/// Form parameters of a token-endpoint exchange, keyed by wire field name.
///
/// A `BTreeMap` keeps the serialized form deterministic.
pub type TokenRequestParams = BTreeMap<&'static str, String>;

/// Boxed future returned by [`TokenRequester`] implementations.
pub type TokenRequestFuture<'a> =
	Pin<Box<dyn Future<Output = Result<OAuthToken, TokenError>> + 'a + Send>>;

/// Abstraction over the low-level token-endpoint exchange.
///
/// Implementations POST `params` as `application/x-www-form-urlencoded`, treat any non-200
/// status as [`TokenError::Endpoint`], and decode the JSON token document on success.
pub trait TokenRequester
where
	Self: Send + Sync,
{
	/// Performs one token exchange.
	fn request_token(&self, params: TokenRequestParams) -> TokenRequestFuture<'_>;
}

/// Reqwest-backed [`TokenRequester`] bound to one token endpoint URL.
#[derive(Clone, Debug)]
pub struct HttpTokenRequester {
	client: ReqwestClient,
	token_url: String,
}
impl HttpTokenRequester {
	/// Builds a requester with a fresh reqwest client.
	pub fn new(token_url: impl Into<String>) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.build()
			.map_err(|source| crate::error::ConfigError::HttpClientBuild { source })?;

		Ok(Self::with_client(client, token_url))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, token_url: impl Into<String>) -> Self {
		Self { client, token_url: token_url.into() }
	}

	/// The token endpoint URL this requester posts to.
	pub fn token_url(&self) -> &str {
		&self.token_url
	}
}
impl AsRef<ReqwestClient> for HttpTokenRequester {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Deref for HttpTokenRequester {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}
impl TokenRequester for HttpTokenRequester {
	fn request_token(&self, params: TokenRequestParams) -> TokenRequestFuture<'_> {
		Box::pin(async move {
			let response = self
				.client
				.post(&self.token_url)
				.header("accept", "application/json")
				.header("user-agent", USER_AGENT)
				.form(&params)
				.send()
				.await
				.map_err(|source| TokenError::Network { source })?;
			let status = response.status();

			// The token endpoint answers 200 exactly; even other 2xx statuses are unexpected.
			if status.as_u16() != 200 {
				return Err(TokenError::Endpoint {
					status: status.as_u16(),
					status_text: status.canonical_reason().unwrap_or_default().to_owned(),
				});
			}

			let bytes = response.bytes().await.map_err(|source| TokenError::Network { source })?;
			let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| TokenError::Decode { source })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn params_serialize_sorted() {
		let mut params = TokenRequestParams::new();

		params.insert("grant_type", "password".into());
		params.insert("client_id", "cid".into());
		params.insert("username", "user@example.org".into());

		let encoded = serde_urlencoded_like(&params);

		assert_eq!(encoded, "client_id=cid&grant_type=password&username=user%40example.org");
	}

	// Mirrors what `reqwest::RequestBuilder::form` produces for a `BTreeMap`.
	fn serde_urlencoded_like(params: &TokenRequestParams) -> String {
		let mut serializer = url::form_urlencoded::Serializer::new(String::new());

		for (key, value) in params {
			serializer.append_pair(key, value);
		}

		serializer.finish()
	}
}
