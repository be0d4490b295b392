//! SDK-level error types shared across grants, transport, and the retry loop.
//!
//! Retryable HTTP statuses never appear here; the retry loop treats them as ordinary values and
//! only terminal conditions surface as errors.

// self
use crate::_prelude::*;

/// SDK-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical SDK error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A grant strategy rejected its parameters.
	#[error(transparent)]
	Grant(#[from] GrantError),
	/// The token endpoint exchange failed.
	#[error(transparent)]
	Token(#[from] TokenError),
	/// The API returned a terminal, non-retryable outcome.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// The token orchestrator failed while the retry loop was acquiring credentials.
	#[error("Failed to refresh access token: {source}")]
	TokenRefresh {
		/// Underlying orchestrator failure.
		source: Box<Error>,
	},
	/// The retry budget was exhausted without a terminal response.
	#[error("Maximum number of retries reached")]
	RetryExhausted,
	/// No strategy produced an access token and the store holds none.
	#[error("No access token to perform the request")]
	NoAccessToken,
}
impl Error {
	/// Wraps an orchestrator failure in the retry loop's refresh context.
	pub fn token_refresh(source: Error) -> Self {
		Self::TokenRefresh { source: Box::new(source) }
	}
}

/// Client construction and option validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Neither a client id nor any pre-existing token material was supplied.
	#[error("Missing required \"client_id\" or \"access_token\" parameter.")]
	MissingCredentials,
	/// A base URL option failed to parse.
	#[error("Invalid {which} URL {value:?}.")]
	InvalidUrl {
		/// Which option was rejected (`api_url` or `oauth_url`).
		which: &'static str,
		/// The offending value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A base URL parsed but does not use an http(s) scheme.
	#[error("Invalid {which} URL {value:?}: expected an http(s) scheme.")]
	UnsupportedScheme {
		/// Which option was rejected (`api_url` or `oauth_url`).
		which: &'static str,
		/// The offending value.
		value: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: ReqwestError,
	},
}

/// Parameter validation failures raised by grant strategies.
///
/// `flow` carries the human label of the attempted exchange (for example `password grant` or
/// `authorization code grant redirect`) and `field` the snake_case option name, so the rendered
/// message always names the exact missing field in quotes.
#[derive(Debug, ThisError)]
pub enum GrantError {
	/// A required option for the attempted grant is absent.
	#[error("Missing required \"{field}\" parameter to perform {flow}")]
	MissingParameter {
		/// Label of the attempted exchange.
		flow: &'static str,
		/// Name of the absent option field.
		field: &'static str,
	},
}

/// Failures of the low-level token endpoint exchange.
#[derive(Debug, ThisError)]
pub enum TokenError {
	/// The token endpoint answered with a non-200 status.
	#[error("HTTP {status} — {status_text}. Could not get token.")]
	Endpoint {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase, empty when unknown.
		status_text: String,
	},
	/// The token endpoint answered 200 with a body that is not a valid token document.
	#[error("Malformed token endpoint response at `{}`.", .source.path())]
	Decode {
		/// Structured parsing failure carrying the JSON path that broke.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The exchange failed below HTTP (DNS, TCP, TLS).
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: ReqwestError,
	},
}

/// Terminal API transport outcomes.
#[derive(Debug, ThisError)]
pub enum ApiError {
	/// Non-OK, non-retryable status; the message carries the raw body text.
	#[error("{status} {status_text}\n\n{body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Canonical reason phrase, empty when unknown.
		status_text: String,
		/// Raw response body text.
		body: String,
	},
	/// OK response whose content type is not `application/json`.
	#[error("Response content type was {content_type:?} but expected JSON")]
	UnexpectedContentType {
		/// The `content-type` header value, empty when absent.
		content_type: String,
	},
	/// OK JSON response that failed to parse.
	#[error("Malformed API response body at `{}`.", .source.path())]
	Decode {
		/// Structured parsing failure carrying the JSON path that broke.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The request failed below HTTP (DNS, TCP, TLS).
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: ReqwestError,
	},
}
