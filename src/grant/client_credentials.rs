//! Client-credentials grant for service-to-service callers.

// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	config::ClientOptions,
	grant,
	http::{TokenRequestParams, TokenRequester},
};

const FLOW: &str = "client credentials grant";

/// True when the options carry both halves of the client credential pair.
pub fn is_eligible(options: &ClientOptions) -> bool {
	token_params(options).is_ok()
}

/// Exchanges the client credential pair for a token.
pub async fn request_token(
	requester: &dyn TokenRequester,
	options: &ClientOptions,
) -> Result<OAuthToken> {
	let params = token_params(options)?;

	Ok(requester.request_token(params).await?)
}

fn token_params(options: &ClientOptions) -> Result<TokenRequestParams, crate::error::GrantError> {
	let client_id = grant::require(FLOW, "client_id", options.client_id.as_deref())?;
	let client_secret = grant::require(FLOW, "client_secret", options.client_secret.as_deref())?;
	let mut params = TokenRequestParams::new();

	params.insert("client_id", client_id.to_owned());
	params.insert("client_secret", client_secret.to_owned());
	params.insert("grant_type", "client_credentials".to_owned());

	if let Some(scope) = grant::optional(options.scope.as_deref()) {
		params.insert("scope", scope.to_owned());
	}

	Ok(params)
}
