//! Resource-owner password grant.

// self
use crate::{
	_prelude::*,
	auth::OAuthToken,
	config::ClientOptions,
	grant,
	http::{TokenRequestParams, TokenRequester},
};

const FLOW: &str = "password grant";

/// True when the options carry a client id plus resource-owner credentials.
pub fn is_eligible(options: &ClientOptions) -> bool {
	token_params(options).is_ok()
}

/// Exchanges the configured resource-owner credentials for a token.
pub async fn request_token(
	requester: &dyn TokenRequester,
	options: &ClientOptions,
) -> Result<OAuthToken> {
	let params = token_params(options)?;

	Ok(requester.request_token(params).await?)
}

fn token_params(options: &ClientOptions) -> Result<TokenRequestParams, crate::error::GrantError> {
	let client_id = grant::require(FLOW, "client_id", options.client_id.as_deref())?;
	let username = grant::require(FLOW, "username", options.username.as_deref())?;
	let password = grant::require(FLOW, "password", options.password.as_deref())?;
	let mut params = TokenRequestParams::new();

	params.insert("client_id", client_id.to_owned());
	params.insert("grant_type", "password".to_owned());
	params.insert("password", password.to_owned());
	params.insert("username", username.to_owned());

	if let Some(client_secret) = grant::optional(options.client_secret.as_deref()) {
		params.insert("client_secret", client_secret.to_owned());
	}
	if let Some(scope) = grant::optional(options.scope.as_deref()) {
		params.insert("scope", scope.to_owned());
	}

	Ok(params)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::GrantError;

	fn full_options() -> ClientOptions {
		ClientOptions::builder()
			.client_id("cid")
			.username("user@example.org")
			.password("hunter2")
			.build()
	}

	#[test]
	fn eligibility_matches_parameter_validation() {
		assert!(is_eligible(&full_options()));

		for missing in ["client_id", "username", "password"] {
			let mut builder = ClientOptions::builder();

			if missing != "client_id" {
				builder = builder.client_id("cid");
			}
			if missing != "username" {
				builder = builder.username("user@example.org");
			}
			if missing != "password" {
				builder = builder.password("hunter2");
			}

			let options = builder.build();

			assert!(!is_eligible(&options));
			assert!(
				matches!(
					token_params(&options),
					Err(GrantError::MissingParameter { flow: "password grant", field })
						if field == missing
				),
				"The error must name the `{missing}` field."
			);
		}
	}

	#[test]
	fn params_carry_credentials_and_optional_fields() {
		let params =
			token_params(&full_options()).expect("Full options must pass validation.");

		assert_eq!(params.get("grant_type").map(String::as_str), Some("password"));
		assert_eq!(params.get("client_id").map(String::as_str), Some("cid"));
		assert_eq!(params.get("username").map(String::as_str), Some("user@example.org"));
		assert_eq!(params.get("password").map(String::as_str), Some("hunter2"));
		// The platform default scope rides along unless explicitly cleared.
		assert_eq!(params.get("scope").map(String::as_str), Some(crate::config::DEFAULT_SCOPE));
		assert_eq!(params.get("client_secret"), None);

		let with_secret = ClientOptions::builder()
			.client_id("cid")
			.username("user@example.org")
			.password("hunter2")
			.client_secret("cs")
			.build();
		let params = token_params(&with_secret).expect("Full options must pass validation.");

		assert_eq!(params.get("client_secret").map(String::as_str), Some("cs"));
	}
}
