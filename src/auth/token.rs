//! OAuth token model shared by grant exchanges and token stores.

// self
use crate::_prelude::*;

/// Token material returned by a successful grant exchange.
///
/// `expires_in` is carried as an opaque lifetime hint in seconds; the SDK never compares it
/// against a wall clock. Staleness is discovered through 401 responses instead.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthToken {
	access_token: String,
	refresh_token: Option<String>,
	expires_in: Option<u64>,
}
impl OAuthToken {
	/// Creates a token holding only an access token.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self { access_token: access_token.into(), refresh_token: None, expires_in: None }
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Attaches the lifetime hint in seconds.
	pub fn with_expires_in(mut self, expires_in: u64) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Returns the access token. Callers must avoid logging this string.
	pub fn access_token(&self) -> &str {
		&self.access_token
	}

	/// Returns the refresh token, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&str> {
		self.refresh_token.as_deref()
	}

	/// Returns the lifetime hint in seconds, if the provider issued one.
	pub fn expires_in(&self) -> Option<u64> {
		self.expires_in
	}
}
impl Debug for OAuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.finish()
	}
}
