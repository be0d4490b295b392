//! Rust SDK for the Propwise property-management platform: OAuth2 grant orchestration,
//! token-bucket rate limiting, and retrying REST dispatch in one client.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod grant;
pub mod http;
pub mod limit;
pub mod methods;
pub mod obs;
pub mod redirect;
pub mod rest;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and test doubles shared by unit and integration tests; enabled
	//! via `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	pub use crate::{
		auth::{MemoryTokenStore, OAuthToken, TokenField, TokenStore, TokenUpdate},
		client::RestClient,
		config::{ClientOptions, ClientOptionsBuilder},
		error::{ApiError, ConfigError, GrantError, TokenError},
		grant::{GrantContext, GrantStep, TokenLifecycle},
		http::{TokenRequestFuture, TokenRequestParams, TokenRequester},
		redirect::{BrowsingSurface, RedirectHandler, StaticSurface},
		rest::{ApiResponse, HttpVerb, RequestPayload},
	};

	/// Token-requester double that records every parameter map it receives.
	pub struct RecordingRequester {
		response: Result<OAuthToken, (u16, String)>,
		calls: Mutex<Vec<TokenRequestParams>>,
	}
	impl RecordingRequester {
		/// Creates a double answering every exchange with `token`.
		pub fn returning(token: OAuthToken) -> Self {
			Self { response: Ok(token), calls: Mutex::new(Vec::new()) }
		}

		/// Creates a double whose exchanges fail like a non-200 token endpoint.
		pub fn failing(status: u16, status_text: &str) -> Self {
			Self { response: Err((status, status_text.to_owned())), calls: Mutex::new(Vec::new()) }
		}

		/// Every parameter map received so far, oldest first.
		pub fn calls(&self) -> Vec<TokenRequestParams> {
			self.calls.lock().clone()
		}

		/// Asserts that exactly one exchange happened and returns its parameters.
		pub fn single_call(&self) -> TokenRequestParams {
			let calls = self.calls.lock();

			assert_eq!(calls.len(), 1, "Expected exactly one token exchange.");

			calls[0].clone()
		}
	}
	impl TokenRequester for RecordingRequester {
		fn request_token(&self, params: TokenRequestParams) -> TokenRequestFuture<'_> {
			self.calls.lock().push(params);

			let response = self.response.clone();

			Box::pin(async move {
				response.map_err(|(status, status_text)| TokenError::Endpoint { status, status_text })
			})
		}
	}

	/// Builds [`ClientOptions`] by letting `customize` extend a default builder.
	pub fn test_options(
		customize: impl FnOnce(ClientOptionsBuilder) -> ClientOptionsBuilder,
	) -> ClientOptions {
		customize(ClientOptions::builder()).build()
	}

	/// Builds a [`GrantContext`] without a browsing surface or redirect handler.
	pub fn grant_context<'a>(
		store: &'a dyn TokenStore,
		requester: &'a dyn TokenRequester,
		options: &'a ClientOptions,
	) -> GrantContext<'a> {
		GrantContext { store, requester, options, surface: None, redirect_handler: None }
	}

	/// Parses a URL literal, panicking on malformed test fixtures.
	pub fn test_url(url: &str) -> Url {
		Url::parse(url).expect("Test URLs must parse.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method as ReqwestMethod};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
