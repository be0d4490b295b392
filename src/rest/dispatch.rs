//! Single-attempt HTTP dispatch: URL composition, header layering, body encoding,
//! and response classification.

// crates.io
use reqwest::multipart;
// self
use crate::{
	_prelude::*,
	config::USER_AGENT,
	error::ApiError,
	limit::RequestQueue,
	rest::{ApiResponse, FormPart, HttpVerb, RETRYABLE_STATUS_CODES, RequestBody, RequestPayload},
};

/// Classified result of one dispatched attempt.
///
/// Retryable statuses come back as values; only terminal conditions are errors.
#[derive(Debug)]
pub(crate) enum DispatchOutcome {
	/// Non-retryable success carrying the parsed body.
	Done(ApiResponse),
	/// Retryable signal; `401` additionally forces a token rotation.
	Retry {
		/// The retryable HTTP status.
		status: u16,
	},
}

/// Issues exactly one HTTP call per [`dispatch`](Self::dispatch), paced by the
/// admission queue.
#[derive(Debug)]
pub(crate) struct Dispatcher {
	http: ReqwestClient,
	queue: RequestQueue,
	api_url: String,
	browser_like: bool,
}
impl Dispatcher {
	pub(crate) fn new(
		http: ReqwestClient,
		queue: RequestQueue,
		api_url: String,
		browser_like: bool,
	) -> Self {
		Self { http, queue, api_url, browser_like }
	}

	/// Submits one attempt and classifies the response.
	pub(crate) async fn dispatch(
		&self,
		access_token: &str,
		verb: HttpVerb,
		api_method: &str,
		payload: &RequestPayload,
	) -> Result<DispatchOutcome, ApiError> {
		let _permit = self.queue.acquire().await;
		let mut request = self.http.request(verb.as_method(), self.compose_url(api_method, payload));

		for (name, value) in self.merge_headers(access_token, payload) {
			request = request.header(name, value);
		}
		request = match &payload.body {
			Some(RequestBody::Json(value)) => request.body(value.to_string()),
			Some(RequestBody::Form(parts)) => request.multipart(build_form(parts)?),
			None => request,
		};

		let response = request.send().await.map_err(|source| ApiError::Network { source })?;

		classify(response).await
	}

	/// `{api_url}/api{api_method}{separator}{query}`; the separator flips to `&` when the
	/// path already carries a query string of its own.
	fn compose_url(&self, api_method: &str, payload: &RequestPayload) -> String {
		let mut url = format!("{}/api{}", self.api_url, api_method);

		if !payload.query.is_empty() {
			let query = url::form_urlencoded::Serializer::new(String::new())
				.extend_pairs(&payload.query)
				.finish();

			url.push(if api_method.contains('?') { '&' } else { '?' });
			url.push_str(&query);
		}

		url
	}

	/// Layers headers: defaults first, caller overrides second. A multipart body drops
	/// any `content-type` so the form encoder's own header stands alone.
	fn merge_headers(
		&self,
		access_token: &str,
		payload: &RequestPayload,
	) -> BTreeMap<String, String> {
		let mut headers = BTreeMap::new();

		headers.insert("accept".into(), "application/json".into());
		headers.insert("authorization".into(), format!("Bearer {access_token}"));
		if matches!(payload.body, Some(RequestBody::Json(_))) {
			headers.insert("content-type".into(), "application/json".into());
		}
		// Browsers own the user-agent header; injecting one there gets requests rejected
		// by the fetch layer rather than the API.
		if !self.browser_like {
			headers.insert("user-agent".into(), USER_AGENT.into());
		}
		for (name, value) in &payload.headers {
			headers.insert(name.to_ascii_lowercase(), value.clone());
		}
		if matches!(payload.body, Some(RequestBody::Form(_))) {
			headers.remove("content-type");
		}

		headers
	}
}

fn build_form(parts: &[(String, FormPart)]) -> Result<multipart::Form, ApiError> {
	let mut form = multipart::Form::new();

	for (name, part) in parts {
		form = match part {
			FormPart::Text(value) => form.text(name.clone(), value.clone()),
			FormPart::File { bytes, file_name, mime } => {
				let part = multipart::Part::bytes(bytes.clone())
					.file_name(file_name.clone())
					.mime_str(mime)
					.map_err(|source| ApiError::Network { source })?;

				form.part(name.clone(), part)
			},
		};
	}

	Ok(form)
}

async fn classify(response: reqwest::Response) -> Result<DispatchOutcome, ApiError> {
	let status = response.status();

	if RETRYABLE_STATUS_CODES.contains(&status.as_u16()) {
		return Ok(DispatchOutcome::Retry { status: status.as_u16() });
	}
	if !status.is_success() {
		let body = response.text().await.map_err(|source| ApiError::Network { source })?;

		return Err(ApiError::Status {
			status: status.as_u16(),
			status_text: status.canonical_reason().unwrap_or("").into(),
			body,
		});
	}
	if status.as_u16() == 204 {
		return Ok(DispatchOutcome::Done(ApiResponse { status: 204, body: serde_json::Value::Null }));
	}

	let content_type = response
		.headers()
		.get("content-type")
		.and_then(|value| value.to_str().ok())
		.unwrap_or("")
		.to_owned();

	if content_type != "application/json" {
		return Err(ApiError::UnexpectedContentType { content_type });
	}

	let bytes = response.bytes().await.map_err(|source| ApiError::Network { source })?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
	let body = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ApiError::Decode { source })?;

	Ok(DispatchOutcome::Done(ApiResponse { status: status.as_u16(), body }))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn dispatcher(browser_like: bool) -> Dispatcher {
		Dispatcher::new(
			ReqwestClient::new(),
			RequestQueue::default(),
			"https://api.propwise.io".into(),
			browser_like,
		)
	}

	#[test]
	fn url_appends_sorted_query_with_a_question_mark() {
		let payload = RequestPayload::new().query("offset", "40").query("limit", "20");

		assert_eq!(
			dispatcher(false).compose_url("/v1/properties", &payload),
			"https://api.propwise.io/api/v1/properties?limit=20&offset=40",
		);
	}

	#[test]
	fn url_separator_flips_when_the_path_already_has_a_query() {
		let payload = RequestPayload::new().query("limit", "20");

		assert_eq!(
			dispatcher(false).compose_url("/v1/properties?embedded=units", &payload),
			"https://api.propwise.io/api/v1/properties?embedded=units&limit=20",
		);
	}

	#[test]
	fn url_stays_bare_without_query_parameters() {
		assert_eq!(
			dispatcher(false).compose_url("/v1/me", &RequestPayload::new()),
			"https://api.propwise.io/api/v1/me",
		);
	}

	#[test]
	fn caller_headers_override_the_defaults() {
		let payload = RequestPayload::new()
			.json(serde_json::json!({"name": "Haus Sonnenschein"}))
			.header("Accept", "application/hal+json");
		let headers = dispatcher(false).merge_headers("t0ken", &payload);

		assert_eq!(headers["accept"], "application/hal+json");
		assert_eq!(headers["authorization"], "Bearer t0ken");
		assert_eq!(headers["content-type"], "application/json");
		assert_eq!(headers["user-agent"], USER_AGENT);
	}

	#[test]
	fn browser_like_dispatch_omits_the_user_agent() {
		let headers = dispatcher(true).merge_headers("t0ken", &RequestPayload::new());

		assert!(!headers.contains_key("user-agent"));
	}

	#[test]
	fn multipart_body_discards_any_caller_content_type() {
		let payload = RequestPayload::new()
			.form(vec![("document".into(), FormPart::Text("hello".into()))])
			.header("Content-Type", "application/json");
		let headers = dispatcher(false).merge_headers("t0ken", &payload);

		assert!(!headers.contains_key("content-type"));
	}
}
