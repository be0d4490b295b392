//! The retry loop every API call runs through.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	obs::{self, RequestOutcome, RequestSpan},
	rest::{ApiResponse, HttpVerb, RequestPayload, dispatch::DispatchOutcome},
};

impl RestClient {
	/// Performs a request, retrying retryable statuses, and resolves to the parsed
	/// response body.
	pub async fn request(
		&self,
		verb: HttpVerb,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<serde_json::Value> {
		Ok(self.request_raw(verb, api_method, payload).await?.body)
	}

	/// Same loop as [`request`](Self::request), resolving to the status and parsed
	/// body pair of the final attempt.
	pub async fn request_raw(
		&self,
		verb: HttpVerb,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<ApiResponse> {
		let span = RequestSpan::request(verb.as_str(), api_method);
		let result = span.instrument(self.retry_request(verb, api_method, payload)).await;

		match &result {
			Ok(_) => obs::record_request_outcome(RequestOutcome::Success),
			Err(_) => {
				self.metrics.record_failure();
				obs::record_request_outcome(RequestOutcome::Failure);
			},
		}

		result
	}

	/// Attempt `0` is free; every further attempt first checks the retry budget, then
	/// sleeps with full multiplicative jitter. Only a `401` on the previous attempt
	/// forces a token rotation.
	async fn retry_request(
		&self,
		verb: HttpVerb,
		api_method: &str,
		payload: RequestPayload,
	) -> Result<ApiResponse> {
		let mut attempt = 0_u32;
		let mut previous_status = None::<u16>;

		loop {
			if attempt > self.options.request_max_retries {
				return Err(Error::RetryExhausted);
			}
			if attempt > 0 {
				let delay = backoff_delay(self.options.request_back_off_interval, attempt);

				obs::note_retry(attempt, delay.as_millis() as u64, previous_status.unwrap_or(0));
				tokio::time::sleep(delay).await;
			}

			let must_refresh = previous_status == Some(401);
			let rotated = self
				.lifecycle
				.maybe_update_token(self.grant_context(), must_refresh)
				.await
				.map_err(Error::token_refresh)?;

			if rotated {
				self.metrics.record_refresh();
			}

			let access_token = self.store.access_token().ok_or(Error::NoAccessToken)?;

			self.metrics.record_attempt();

			match self.dispatcher.dispatch(&access_token, verb, api_method, &payload).await? {
				DispatchOutcome::Done(response) => return Ok(response),
				DispatchOutcome::Retry { status } => {
					self.metrics.record_retry();
					obs::record_request_outcome(RequestOutcome::Retry);

					previous_status = Some(status);
				},
			}

			attempt += 1;
		}
	}
}

/// `ceil(random() * base * 2^attempt)` milliseconds.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
	let jitter = rand::random::<f64>();
	let millis = (jitter * base.as_millis() as f64 * 2_f64.powi(attempt as i32)).ceil();

	Duration::from_millis(millis as u64)
}
