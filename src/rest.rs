//! Request payloads, response envelopes, and the dispatch layer of the REST surface.

pub(crate) mod dispatch;

// self
use crate::_prelude::*;

/// HTTP statuses the retry loop treats as retryable signals instead of errors.
///
/// `401` additionally forces a token rotation before the next attempt.
pub const RETRYABLE_STATUS_CODES: [u16; 6] = [401, 408, 429, 502, 503, 504];

/// HTTP verbs exposed by the request surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpVerb {
	/// `DELETE`.
	Delete,
	/// `GET`.
	Get,
	/// `PATCH`.
	Patch,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
}
impl HttpVerb {
	/// Lowercase verb label used in logs and spans.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Delete => "delete",
			Self::Get => "get",
			Self::Patch => "patch",
			Self::Post => "post",
			Self::Put => "put",
		}
	}

	pub(crate) fn as_method(&self) -> ReqwestMethod {
		match self {
			Self::Delete => ReqwestMethod::DELETE,
			Self::Get => ReqwestMethod::GET,
			Self::Patch => ReqwestMethod::PATCH,
			Self::Post => ReqwestMethod::POST,
			Self::Put => ReqwestMethod::PUT,
		}
	}
}
impl Display for HttpVerb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Optional parts of an API request: body, query map, and extra headers.
///
/// Query parameters render sorted by key. Caller headers override the dispatcher's
/// defaults, except that a multipart body always supplies its own `content-type`.
#[derive(Clone, Debug, Default)]
pub struct RequestPayload {
	pub(crate) body: Option<RequestBody>,
	pub(crate) query: BTreeMap<String, String>,
	pub(crate) headers: BTreeMap<String, String>,
}
impl RequestPayload {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a JSON body.
	pub fn json(mut self, body: serde_json::Value) -> Self {
		self.body = Some(RequestBody::Json(body));

		self
	}

	/// Sets a multipart form body from named parts.
	pub fn form(mut self, parts: Vec<(String, FormPart)>) -> Self {
		self.body = Some(RequestBody::Form(parts));

		self
	}

	/// Adds one query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Adds one header; names are matched case-insensitively against the defaults.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}
}

/// Request body forms the dispatcher can encode.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// JSON value serialized with `content-type: application/json`.
	Json(serde_json::Value),
	/// Multipart form whose encoder supplies the `content-type` boundary header.
	Form(Vec<(String, FormPart)>),
}

/// One part of a multipart form body.
#[derive(Clone)]
pub enum FormPart {
	/// Plain text field.
	Text(String),
	/// File field.
	File {
		/// Raw file content.
		bytes: Vec<u8>,
		/// File name sent with the part.
		file_name: String,
		/// MIME type sent with the part.
		mime: String,
	},
}
impl Debug for FormPart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
			Self::File { bytes, file_name, mime } => f
				.debug_struct("File")
				.field("bytes", &bytes.len())
				.field("file_name", file_name)
				.field("mime", mime)
				.finish(),
		}
	}
}

/// Status and parsed body of the final attempt, as returned by the raw surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Parsed JSON body; `Null` for `204 No Content`.
	pub body: serde_json::Value,
}
