//! Implicit grant for browser-like surfaces.
//!
//! Tokens arrive in the URL fragment after the authorize redirect, so besides the usual
//! eligibility and authorize-URL builders this module owns the fragment helpers: harvesting a
//! token out of a location and scrubbing the OAuth response keys back out of it.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::OAuthToken, config::ClientOptions, grant};

const FLOW: &str = "implicit grant";
const RESPONSE_TYPE: &str = "token";

/// Fragment keys the authorize endpoint appends to the redirect URI.
const OAUTH_RESPONSE_KEYS: [&str; 5] =
	["access_token", "expires_in", "scope", "state", "token_type"];

/// True when the options suffice to send the caller through the authorize redirect.
pub fn is_eligible_for_client_redirect(options: &ClientOptions) -> bool {
	redirect_query(options, None).is_ok()
}

/// Builds `{oauth_url}/oauth/authorize?…` for the implicit style.
///
/// When no `redirect_uri` is configured, the surface's current location stands in for it, the
/// way a browser client bounces back to the page that started the flow.
pub fn get_redirect_url(options: &ClientOptions, current_location: Option<&Url>) -> Result<Url> {
	grant::authorize_url(options, &redirect_query(options, current_location)?)
}

/// Harvests a fragment-delivered token from `url`.
///
/// Returns `None` when the URL carries no fragment or no `access_token` key. For duplicated
/// keys the first occurrence wins, both for `access_token` and `expires_in`; an empty first
/// `access_token` yields `None` rather than deferring to a later occurrence, and an
/// `expires_in` that is not a whole number counts as absent.
pub fn extract_oauth_token_from_url(url: &str) -> Option<OAuthToken> {
	let (_, fragment) = url.split_once('#')?;
	let mut access_token = None;
	let mut expires_in = None;
	let mut expires_seen = false;

	for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
		match key.as_ref() {
			"access_token" if access_token.is_none() => access_token = Some(value.into_owned()),
			"expires_in" if !expires_seen => {
				expires_seen = true;
				expires_in = value.parse::<u64>().ok();
			},
			_ => (),
		}
	}

	let mut token = OAuthToken::new(access_token.filter(|token| !token.is_empty())?);

	if let Some(expires_in) = expires_in {
		token = token.with_expires_in(expires_in);
	}

	Some(token)
}

/// Removes the OAuth response keys from the fragment of `location`, in place.
///
/// Untouched fragment parameters keep their text and order; stripping the last parameter drops
/// the fragment entirely.
pub fn strip_oauth_token_from_location(location: &mut Url) {
	let Some(fragment) = location.fragment() else {
		return;
	};
	let kept = fragment
		.split('&')
		.filter(|segment| {
			if segment.is_empty() {
				return false;
			}

			// Compare against the decoded key while keeping the raw segment text.
			match form_urlencoded::parse(segment.as_bytes()).next() {
				Some((key, _)) => !OAUTH_RESPONSE_KEYS.contains(&key.as_ref()),
				None => true,
			}
		})
		.collect::<Vec<_>>()
		.join("&");

	location.set_fragment(if kept.is_empty() { None } else { Some(&kept) });
}

fn redirect_query(
	options: &ClientOptions,
	current_location: Option<&Url>,
) -> Result<BTreeMap<&'static str, String>, crate::error::GrantError> {
	let client_id = grant::require(FLOW, "client_id", options.client_id.as_deref())?;
	let mut query = BTreeMap::new();

	query.insert("client_id", client_id.to_owned());
	query.insert("response_type", RESPONSE_TYPE.to_owned());

	if let Some(redirect_uri) = grant::optional(options.redirect_uri.as_deref())
		.map(ToOwned::to_owned)
		.or_else(|| current_location.map(ToString::to_string))
	{
		query.insert("redirect_uri", redirect_uri);
	}
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

	#[test]
	fn eligibility_needs_only_a_client_id() {
		assert!(is_eligible_for_client_redirect(&ClientOptions::builder().client_id("cid").build()));
		assert!(!is_eligible_for_client_redirect(&ClientOptions::builder().build()));
		assert!(matches!(
			redirect_query(&ClientOptions::builder().build(), None),
			Err(GrantError::MissingParameter { flow: "implicit grant", field: "client_id" })
		));
	}

	#[test]
	fn redirect_url_falls_back_to_the_current_location() {
		let options = ClientOptions::builder()
			.client_id("cid")
			.oauth_url("https://accounts.example.org")
			.build();
		let here = Url::parse("https://app.example.org/dashboard").expect("Valid URL.");
		let url = get_redirect_url(&options, Some(&here))
			.expect("Eligible options must build a URL.");

		assert_eq!(
			url.as_str(),
			"https://accounts.example.org/oauth/authorize?client_id=cid&redirect_uri=https%3A%2F%2Fapp.example.org%2Fdashboard&response_type=token&scope=user%3Aprofile"
		);

		// An explicit redirect_uri wins over the surface location.
		let options = ClientOptions::builder()
			.client_id("cid")
			.oauth_url("https://accounts.example.org")
			.redirect_uri("https://app.example.org/cb")
			.build();
		let url = get_redirect_url(&options, Some(&here))
			.expect("Eligible options must build a URL.");

		assert!(url.as_str().contains("redirect_uri=https%3A%2F%2Fapp.example.org%2Fcb"));
	}

	#[test]
	fn extraction_requires_an_access_token() {
		assert_eq!(extract_oauth_token_from_url("#expires_in=3600"), None);
		assert_eq!(extract_oauth_token_from_url("https://app.example.org/no-fragment"), None);
	}

	#[test]
	fn extraction_takes_the_first_occurrence() {
		let token = extract_oauth_token_from_url("#access_token=1234&access_token=12345")
			.expect("An access token is present.");

		assert_eq!(token.access_token(), "1234");
		assert_eq!(token.expires_in(), None);

		let token = extract_oauth_token_from_url(
			"#access_token=1234&access_token=12345&expires_in=3600&&expires_in=7200",
		)
		.expect("An access token is present.");

		assert_eq!(token.access_token(), "1234");
		assert_eq!(token.expires_in(), Some(3_600));
	}

	#[test]
	fn extraction_does_not_fall_through_an_empty_first_occurrence() {
		assert_eq!(extract_oauth_token_from_url("#access_token=&access_token=1234"), None);
		assert_eq!(extract_oauth_token_from_url("#access_token="), None);
	}

	#[test]
	fn extraction_works_on_full_urls() {
		let token = extract_oauth_token_from_url(
			"https://app.example.org/cb#access_token=atk&expires_in=600&token_type=Bearer",
		)
		.expect("An access token is present.");

		assert_eq!(token.access_token(), "atk");
		assert_eq!(token.expires_in(), Some(600));
	}

	#[test]
	fn strip_preserves_untouched_keys_in_order() {
		let mut location = Url::parse(
			"https://app.example.org/cb#param1=val1&access_token=1234&access_token=12345&expires_in=3600&scope=test&state=tzxvsfpwe&param2=val2",
		)
		.expect("Valid URL.");

		strip_oauth_token_from_location(&mut location);

		assert_eq!(location.fragment(), Some("param1=val1&param2=val2"));
	}

	#[test]
	fn strip_drops_an_emptied_fragment() {
		let mut location =
			Url::parse("https://app.example.org/cb#access_token=1234&token_type=Bearer")
				.expect("Valid URL.");

		strip_oauth_token_from_location(&mut location);

		assert_eq!(location.fragment(), None);
		assert_eq!(location.as_str(), "https://app.example.org/cb");
	}
}
