//! OAuth2 grant strategies and the fixed order the orchestrator walks them in.
//!
//! Every strategy is a pair of pure functions over [`ClientOptions`]: an eligibility predicate
//! and a token request (or authorize-URL builder for the redirect styles). Eligibility is
//! defined as "parameter validation would pass", so the two can never disagree.

pub mod authorization_code;
pub mod client_credentials;
pub mod implicit;
pub mod orchestrator;
pub mod password;
pub mod refresh_token;

pub use orchestrator::*;

// self
use crate::{_prelude::*, config::ClientOptions, error::GrantError};

/// One step of the orchestrator's strategy walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantStep {
	/// Refresh an existing session with a stored or configured refresh token.
	RefreshToken,
	/// Resource-owner password credentials.
	Password,
	/// Implicit grant on a browser-like surface (fragment harvest or redirect).
	Implicit,
	/// Direct exchange of a configured authorization code.
	AuthorizationCode,
	/// Hand the authorization-code authorize URL to an injected redirect handler.
	AuthorizationCodeRedirect,
	/// Service-to-service client credentials.
	ClientCredentials,
}
impl GrantStep {
	/// Stable lowercase label, mainly for logs and metrics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::RefreshToken => "refresh_token",
			Self::Password => "password",
			Self::Implicit => "implicit",
			Self::AuthorizationCode => "authorization_code",
			Self::AuthorizationCodeRedirect => "authorization_code_redirect",
			Self::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Strategy order the orchestrator walks, highest priority first.
///
/// The order is part of the client contract: a client configured for several grants always
/// prefers the cheapest non-interactive path, and redirect styles outrank client credentials
/// so browser sessions never silently downgrade to a service identity.
pub const GRANT_PRIORITY: [GrantStep; 6] = [
	GrantStep::RefreshToken,
	GrantStep::Password,
	GrantStep::Implicit,
	GrantStep::AuthorizationCode,
	GrantStep::AuthorizationCodeRedirect,
	GrantStep::ClientCredentials,
];

// Presence check shared by every strategy. Empty strings count as missing, mirroring the
// platform's treatment of blank configuration values.
pub(crate) fn require<'a>(
	flow: &'static str,
	field: &'static str,
	value: Option<&'a str>,
) -> Result<&'a str, GrantError> {
	value.filter(|v| !v.is_empty()).ok_or(GrantError::MissingParameter { flow, field })
}

pub(crate) fn optional(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

// Builds `{oauth_url}/oauth/authorize?{sorted query}`.
pub(crate) fn authorize_url(
	options: &ClientOptions,
	query: &BTreeMap<&'static str, String>,
) -> crate::error::Result<Url> {
	let base = options.oauth_authorize_url();
	let mut url =
		Url::parse(&base).map_err(|source| crate::error::ConfigError::InvalidUrl {
			which: "oauth_url",
			value: base.clone(),
			source,
		})?;

	{
		let mut pairs = url.query_pairs_mut();

		for (key, value) in query {
			pairs.append_pair(key, value);
		}
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn priority_order_is_fixed() {
		assert_eq!(GRANT_PRIORITY, [
			GrantStep::RefreshToken,
			GrantStep::Password,
			GrantStep::Implicit,
			GrantStep::AuthorizationCode,
			GrantStep::AuthorizationCodeRedirect,
			GrantStep::ClientCredentials,
		]);
	}

	#[test]
	fn require_treats_blank_values_as_missing() {
		assert!(require("password grant", "client_id", Some("cid")).is_ok());
		assert!(matches!(
			require("password grant", "client_id", Some("")),
			Err(GrantError::MissingParameter { flow: "password grant", field: "client_id" })
		));
		assert!(require("password grant", "client_id", None).is_err());
	}

	#[test]
	fn authorize_url_serializes_sorted_query() {
		let options = crate::config::ClientOptions::builder()
			.oauth_url("https://accounts.example.org")
			.build();
		let mut query = BTreeMap::new();

		query.insert("response_type", "code".to_owned());
		query.insert("client_id", "cid".to_owned());
		query.insert("redirect_uri", "https://app.example.org/cb".to_owned());

		let url = authorize_url(&options, &query).expect("The authorize URL must build.");

		assert_eq!(
			url.as_str(),
			"https://accounts.example.org/oauth/authorize?client_id=cid&redirect_uri=https%3A%2F%2Fapp.example.org%2Fcb&response_type=code"
		);
	}
}
