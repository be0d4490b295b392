//! Authorization-code grant, both the direct exchange and the redirect hand-off.
//!
//! The direct style exchanges a code the embedding application already obtained; the redirect
//! style only builds the authorize URL and leaves the round trip to the caller.

// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	config::ClientOptions,
	grant,
	http::{TokenRequestParams, TokenRequester},
};

const FLOW: &str = "authorization code grant";
const REDIRECT_FLOW: &str = "authorization code grant redirect";
const RESPONSE_TYPE: &str = "code";

/// True when a configured authorization code is ready for direct exchange.
pub fn is_eligible(options: &ClientOptions) -> bool {
	token_params(options, None).is_ok()
}

/// True when the options suffice to send the caller through the authorize redirect.
pub fn is_eligible_for_client_redirect(options: &ClientOptions) -> bool {
	redirect_query(options).is_ok()
}

/// Exchanges an authorization code for a token.
///
/// `code` overrides the configured `authorization_code` option, which covers the common case of
/// a client constructed before the code arrived on the redirect URI.
pub async fn request_token(
	requester: &dyn TokenRequester,
	options: &ClientOptions,
	code: Option<&str>,
) -> Result<OAuthToken> {
	let params = token_params(options, code)?;

	Ok(requester.request_token(params).await?)
}

/// Builds `{oauth_url}/oauth/authorize?…` for the redirect style.
pub fn get_redirect_url(options: &ClientOptions) -> Result<Url> {
	grant::authorize_url(options, &redirect_query(options)?)
}

fn token_params(
	options: &ClientOptions,
	code: Option<&str>,
) -> Result<TokenRequestParams, crate::error::GrantError> {
	let client_id = grant::require(FLOW, "client_id", options.client_id.as_deref())?;
	let redirect_uri = grant::require(FLOW, "redirect_uri", options.redirect_uri.as_deref())?;
	let code = grant::require(
		FLOW,
		"authorization_code",
		grant::optional(code).or(options.authorization_code.as_deref()),
	)?;
	let mut params = TokenRequestParams::new();

	params.insert("client_id", client_id.to_owned());
	params.insert("code", code.to_owned());
	params.insert("grant_type", "authorization_code".to_owned());
	params.insert("redirect_uri", redirect_uri.to_owned());

	if let Some(client_secret) = grant::optional(options.client_secret.as_deref()) {
		params.insert("client_secret", client_secret.to_owned());
	}

	Ok(params)
}

fn redirect_query(
	options: &ClientOptions,
) -> Result<BTreeMap<&'static str, String>, crate::error::GrantError> {
	let client_id = grant::require(REDIRECT_FLOW, "client_id", options.client_id.as_deref())?;
	let redirect_uri =
		grant::require(REDIRECT_FLOW, "redirect_uri", options.redirect_uri.as_deref())?;
	let mut query = BTreeMap::new();

	query.insert("client_id", client_id.to_owned());
	query.insert("redirect_uri", redirect_uri.to_owned());
	query.insert("response_type", RESPONSE_TYPE.to_owned());

	if let Some(scope) = grant::optional(options.scope.as_deref()) {
		query.insert("scope", scope.to_owned());
	}
	if let Some(state) = grant::optional(options.state.as_deref()) {
		query.insert("state", state.to_owned());
	}

	Ok(query)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::GrantError;

	fn exchange_options() -> ClientOptions {
		ClientOptions::builder()
			.client_id("cid")
			.redirect_uri("https://app.example.org/cb")
			.authorization_code("auth-code")
			.build()
	}

	#[test]
	fn eligibility_matches_parameter_validation() {
		assert!(is_eligible(&exchange_options()));

		let missing_code =
			ClientOptions::builder().client_id("cid").redirect_uri("https://app/cb").build();

		assert!(!is_eligible(&missing_code));
		assert!(matches!(
			token_params(&missing_code, None),
			Err(GrantError::MissingParameter {
				flow: "authorization code grant",
				field: "authorization_code"
			})
		));
		// The redirect style needs no code.
		assert!(is_eligible_for_client_redirect(&missing_code));

		let missing_redirect = ClientOptions::builder().client_id("cid").build();

		assert!(!is_eligible_for_client_redirect(&missing_redirect));
		assert!(matches!(
			redirect_query(&missing_redirect),
			Err(GrantError::MissingParameter {
				flow: "authorization code grant redirect",
				field: "redirect_uri"
			})
		));
	}

	#[test]
	fn explicit_code_overrides_the_configured_one() {
		let params = token_params(&exchange_options(), Some("fresher-code"))
			.expect("Full options must pass validation.");

		assert_eq!(params.get("code").map(String::as_str), Some("fresher-code"));
		assert_eq!(params.get("grant_type").map(String::as_str), Some("authorization_code"));
	}

	#[test]
	fn redirect_url_carries_sorted_query_and_state() {
		let options = ClientOptions::builder()
			.client_id("cid")
			.redirect_uri("https://app.example.org/cb")
			.state("opaque-state")
			.oauth_url("https://accounts.example.org")
			.build();
		let url = get_redirect_url(&options).expect("Eligible options must build a URL.");

		assert_eq!(
			url.as_str(),
			"https://accounts.example.org/oauth/authorize?client_id=cid&redirect_uri=https%3A%2F%2Fapp.example.org%2Fcb&response_type=code&scope=user%3Aprofile&state=opaque-state"
		);
	}
}
