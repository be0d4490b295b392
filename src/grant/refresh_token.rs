//! Refresh-token grant.

// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	config::ClientOptions,
	grant,
	http::{TokenRequestParams, TokenRequester},
};

const FLOW: &str = "refresh token grant";

/// True when the options carry a client id and a refresh token.
pub fn is_eligible(options: &ClientOptions) -> bool {
	token_params(options).is_ok()
}

/// Trades the configured refresh token for a fresh session.
pub async fn request_token(
	requester: &dyn TokenRequester,
	options: &ClientOptions,
) -> Result<OAuthToken> {
	let params = token_params(options)?;

	Ok(requester.request_token(params).await?)
}

fn token_params(options: &ClientOptions) -> Result<TokenRequestParams, crate::error::GrantError> {
	let client_id = grant::require(FLOW, "client_id", options.client_id.as_deref())?;
	let refresh_token = grant::require(FLOW, "refresh_token", options.refresh_token.as_deref())?;
	let mut params = TokenRequestParams::new();

	params.insert("client_id", client_id.to_owned());
	params.insert("grant_type", "refresh_token".to_owned());
	params.insert("refresh_token", refresh_token.to_owned());

	if let Some(client_secret) = grant::optional(options.client_secret.as_deref()) {
		params.insert("client_secret", client_secret.to_owned());
	}
	if let Some(scope) = grant::optional(options.scope.as_deref()) {
		params.insert("scope", scope.to_owned());
	}

	Ok(params)
}
