//! Grant orchestration with singleflight rotation.
//!
//! Every API request funnels through [`TokenLifecycle::maybe_update_token`] before it
//! is dispatched. The lifecycle checks the shared [`TokenStore`] and, when a token is
//! missing or a forced rotation was requested, walks the grant chain in
//! [`crate::grant::GRANT_PRIORITY`] order until a strategy is eligible. Concurrent
//! callers serialize on one guard so a burst of requests performs a single exchange.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, TokenField, TokenStore, TokenUpdate},
	config::ClientOptions,
	grant::{GrantStep, authorization_code, client_credentials, implicit, password, refresh_token},
	http::TokenRequester,
	obs::{self, ExchangeOutcome, RequestSpan},
	redirect::{BrowsingSurface, RedirectHandler},
};

/// Borrowed collaborators for one pass over the grant chain.
#[derive(Clone, Copy)]
pub struct GrantContext<'a> {
	/// Token storage shared with the dispatcher.
	pub store: &'a dyn TokenStore,
	/// Transport for `{oauth_url}/oauth/token` exchanges.
	pub requester: &'a dyn TokenRequester,
	/// Client configuration driving grant eligibility.
	pub options: &'a ClientOptions,
	/// Browsing surface consumed by the implicit grant, when one is attached.
	pub surface: Option<&'a dyn BrowsingSurface>,
	/// Sink for authorization code redirect URLs, when one is attached.
	pub redirect_handler: Option<&'a dyn RedirectHandler>,
}
impl Debug for GrantContext<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GrantContext")
			.field("options", self.options)
			.field("surface", &self.surface.is_some())
			.field("redirect_handler", &self.redirect_handler.is_some())
			.finish()
	}
}

/// Serializes token rotation across concurrent requests.
///
/// All in-flight requests of one client share a single lifecycle value. The first
/// caller that finds the store empty, or is told to force a rotation after a `401`,
/// takes the guard and walks the grant chain; callers queued behind it observe the
/// bumped generation and reuse the freshly stored token instead of repeating the
/// exchange.
#[derive(Debug, Default)]
pub struct TokenLifecycle {
	guard: AsyncMutex<()>,
	generation: AtomicU64,
}
impl TokenLifecycle {
	/// Creates an idle lifecycle with generation `0`.
	pub fn new() -> Self {
		Self::default()
	}

	/// Rotation counter; bumps once per committed token.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Relaxed)
	}

	/// Ensures the store holds an access token, acquiring one if necessary.
	///
	/// With `must_refresh` the cached token is treated as stale and the chain runs even
	/// though the store is populated. Returns whether this call stored a fresh token;
	/// when no grant is eligible it resolves `Ok(false)` without touching the store and
	/// the caller decides whether an anonymous request makes sense.
	pub async fn maybe_update_token(
		&self,
		ctx: GrantContext<'_>,
		must_refresh: bool,
	) -> Result<bool> {
		if !must_refresh && ctx.store.has_access_token() {
			return Ok(false);
		}

		let snapshot = self.generation.load(Ordering::Relaxed);
		let _singleflight = self.guard.lock().await;

		// A rotation that completed while this caller waited already stored a fresh
		// token; running the chain again would burn another refresh token.
		if self.generation.load(Ordering::Relaxed) != snapshot && ctx.store.has_access_token() {
			return Ok(false);
		}

		// The stored refresh token wins over the configured one so rotated credentials
		// keep flowing once the first exchange succeeded.
		let mut refresh_options = ctx.options.clone();

		refresh_options.refresh_token =
			ctx.store.get(TokenField::RefreshToken).or(refresh_options.refresh_token);

		if refresh_token::is_eligible(&refresh_options) {
			let token = self
				.exchange(
					GrantStep::RefreshToken,
					refresh_token::request_token(ctx.requester, &refresh_options),
				)
				.await?;

			self.commit(ctx.store, GrantStep::RefreshToken, &token);

			return Ok(true);
		}
		if password::is_eligible(ctx.options) {
			let token = self
				.exchange(GrantStep::Password, password::request_token(ctx.requester, ctx.options))
				.await?;

			self.commit(ctx.store, GrantStep::Password, &token);

			return Ok(true);
		}
		if ctx.options.implicit && let Some(surface) = ctx.surface {
			return self.run_implicit(ctx, surface);
		}
		// A forced rotation must not replay the single-use authorization code.
		if !must_refresh && authorization_code::is_eligible(ctx.options) {
			let token = self
				.exchange(
					GrantStep::AuthorizationCode,
					authorization_code::request_token(ctx.requester, ctx.options, None),
				)
				.await?;

			self.commit(ctx.store, GrantStep::AuthorizationCode, &token);

			return Ok(true);
		}
		if let Some(handler) = ctx.redirect_handler
			&& authorization_code::is_eligible_for_client_redirect(ctx.options)
		{
			let redirect = authorization_code::get_redirect_url(ctx.options)?;

			handler.handle(&redirect);

			return Ok(false);
		}
		if client_credentials::is_eligible(ctx.options) {
			let token = self
				.exchange(
					GrantStep::ClientCredentials,
					client_credentials::request_token(ctx.requester, ctx.options),
				)
				.await?;

			self.commit(ctx.store, GrantStep::ClientCredentials, &token);

			return Ok(true);
		}

		Ok(false)
	}

	/// Harvests a token from the surface's fragment, or sends the surface to the
	/// authorize endpoint when no fragment is present yet.
	///
	/// The harvest runs regardless of the configured credentials; a fragment-delivered
	/// token needs no authorize parameters. Only the navigation arm is gated on them.
	fn run_implicit(&self, ctx: GrantContext<'_>, surface: &dyn BrowsingSurface) -> Result<bool> {
		let current = surface.current_url();

		if let Some(url) = &current
			&& let Some(token) = implicit::extract_oauth_token_from_url(url.as_str())
		{
			let mut cleaned = url.clone();

			implicit::strip_oauth_token_from_location(&mut cleaned);
			surface.replace_url(cleaned);
			self.commit(ctx.store, GrantStep::Implicit, &token);

			return Ok(true);
		}
		if !implicit::is_eligible_for_client_redirect(ctx.options) {
			return Ok(false);
		}

		// The token arrives on the redirected location; the next pass picks it up.
		let redirect = implicit::get_redirect_url(ctx.options, current.as_ref())?;

		surface.navigate(redirect);

		Ok(false)
	}

	async fn exchange<Fut>(&self, step: GrantStep, fut: Fut) -> Result<OAuthToken>
	where
		Fut: Future<Output = Result<OAuthToken>>,
	{
		let span = RequestSpan::exchange(step);

		obs::record_token_exchange(step, ExchangeOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_token_exchange(step, ExchangeOutcome::Success),
			Err(_) => obs::record_token_exchange(step, ExchangeOutcome::Failure),
		}

		result
	}

	pub(crate) fn commit(&self, store: &dyn TokenStore, step: GrantStep, token: &OAuthToken) {
		store.set(TokenUpdate::from(token));
		// The guard provides the ordering; the counter only has to move.
		self.generation.fetch_add(1, Ordering::Relaxed);
		obs::note_refresh(step);
	}
}
