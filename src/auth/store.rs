//! Token store contract plus the in-memory implementation shipped with the SDK.
//!
//! A store is a tiny mutable holder for the three OAuth fields. It performs no I/O and enforces
//! no expiry policy; persistence and lifetimes beyond the process belong to caller-supplied
//! implementations.

// self
use crate::_prelude::*;
use crate::auth::OAuthToken;

/// Fixed field set a [`TokenStore`] can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenField {
	/// Bearer access token.
	AccessToken,
	/// Refresh token.
	RefreshToken,
	/// Opaque lifetime hint in seconds.
	ExpiresIn,
}
impl TokenField {
	/// Stable lowercase label, mainly for logs.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::RefreshToken => "refresh_token",
			Self::ExpiresIn => "expires_in",
		}
	}
}
impl Display for TokenField {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Partial token written into a store.
///
/// Fields set to `Some` overwrite the stored value; `None` fields are left untouched. This is
/// the merge rule callers rely on when, for example, a refresh exchange answers without a new
/// refresh token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenUpdate {
	access_token: Option<String>,
	refresh_token: Option<String>,
	expires_in: Option<u64>,
}
impl TokenUpdate {
	/// Creates an update that touches nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the access token field.
	pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
		self.access_token = Some(access_token.into());

		self
	}

	/// Sets the refresh token field.
	pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Sets the lifetime hint field.
	pub fn expires_in(mut self, expires_in: u64) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Renders the update as `(field, value)` pairs, skipping untouched fields.
	pub fn entries(&self) -> Vec<(TokenField, String)> {
		let mut entries = Vec::with_capacity(3);

		if let Some(v) = &self.access_token {
			entries.push((TokenField::AccessToken, v.clone()));
		}
		if let Some(v) = &self.refresh_token {
			entries.push((TokenField::RefreshToken, v.clone()));
		}
		if let Some(v) = self.expires_in {
			entries.push((TokenField::ExpiresIn, v.to_string()));
		}

		entries
	}
}
impl From<&OAuthToken> for TokenUpdate {
	fn from(token: &OAuthToken) -> Self {
		Self {
			access_token: Some(token.access_token().to_owned()),
			refresh_token: token.refresh_token().map(ToOwned::to_owned),
			expires_in: token.expires_in(),
		}
	}
}
impl Debug for TokenUpdate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenUpdate")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Mutable holder for the current OAuth token material.
///
/// Implementations must be safe to share across concurrent tasks.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the stored value for `field`, if any.
	fn get(&self, field: TokenField) -> Option<String>;

	/// Merges `update` into the store.
	fn set(&self, update: TokenUpdate);

	/// Clears every stored field.
	fn reset(&self);

	/// Returns the stored access token.
	fn access_token(&self) -> Option<String> {
		self.get(TokenField::AccessToken)
	}

	/// True when an access token is currently stored.
	fn has_access_token(&self) -> bool {
		self.access_token().is_some()
	}
}

/// Process-local [`TokenStore`] backed by a lock-guarded map.
#[derive(Debug, Default)]
pub struct MemoryTokenStore(RwLock<HashMap<TokenField, String>>);
impl MemoryTokenStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}
}
impl TokenStore for MemoryTokenStore {
	fn get(&self, field: TokenField) -> Option<String> {
		self.0.read().get(&field).cloned()
	}

	fn set(&self, update: TokenUpdate) {
		let mut map = self.0.write();

		for (field, value) in update.entries() {
			map.insert(field, value);
		}
	}

	fn reset(&self) {
		self.0.write().clear();
	}
}
