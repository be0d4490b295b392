//! Redirect capabilities for the browser-coupled grants.
//!
//! The orchestrator never touches a real browser. Implicit-grant extraction and redirect-style
//! hand-offs go through these seams, so the flow logic runs unchanged under a webview, a system
//! browser bridge, or a test double.

// self
use crate::_prelude::*;

/// A browser-like surface the client is embedded in.
///
/// Wire one up (via the client builder) to enable the implicit grant: the orchestrator reads the
/// current URL to harvest fragment-delivered tokens and navigates the surface to the
/// authorization endpoint when no token is present.
pub trait BrowsingSurface
where
	Self: Send + Sync,
{
	/// Returns the URL the surface currently shows.
	fn current_url(&self) -> Option<Url>;

	/// Replaces the visible URL without triggering a navigation.
	fn replace_url(&self, url: Url);

	/// Navigates the surface to `url`.
	fn navigate(&self, url: Url);
}

/// Receiver for authorization-code redirect URLs.
///
/// When the orchestrator decides the caller must be sent through the authorization-code redirect,
/// it hands the authorize URL to this callback instead of performing any navigation itself.
pub trait RedirectHandler
where
	Self: Send + Sync,
{
	/// Delivers the authorize URL to the embedding application.
	fn handle(&self, url: &Url);
}
impl<F> RedirectHandler for F
where
	F: Fn(&Url) + Send + Sync,
{
	fn handle(&self, url: &Url) {
		self(url)
	}
}

/// In-memory [`BrowsingSurface`] for tests and headless embedders.
///
/// Holds a single mutable location and records every navigation it is asked to perform.
#[derive(Debug, Default)]
pub struct StaticSurface {
	current: RwLock<Option<Url>>,
	navigations: RwLock<Vec<Url>>,
}
impl StaticSurface {
	/// Creates a surface without a location.
	pub fn detached() -> Self {
		Self::default()
	}

	/// Creates a surface currently showing `url`.
	pub fn at(url: Url) -> Self {
		Self { current: RwLock::new(Some(url)), navigations: RwLock::new(Vec::new()) }
	}

	/// Returns every URL passed to [`BrowsingSurface::navigate`], oldest first.
	pub fn navigations(&self) -> Vec<Url> {
		self.navigations.read().clone()
	}
}
impl BrowsingSurface for StaticSurface {
	fn current_url(&self) -> Option<Url> {
		self.current.read().clone()
	}

	fn replace_url(&self, url: Url) {
		*self.current.write() = Some(url);
	}

	fn navigate(&self, url: Url) {
		self.navigations.write().push(url.clone());
		*self.current.write() = Some(url);
	}
}
