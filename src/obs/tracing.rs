// self
use crate::{_prelude::*, grant::GrantStep};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder covering one SDK operation.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a span covering one retried API request.
	pub fn request(verb: &'static str, method: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("propwise_sdk.request", verb, method);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (verb, method);

			Self {}
		}
	}

	/// Creates a span covering one token-endpoint exchange.
	pub fn exchange(grant: GrantStep) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("propwise_sdk.exchange", grant = grant.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = grant;

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> RequestSpanGuard {
		#[cfg(feature = "tracing")]
		{
			RequestSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			RequestSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`RequestSpan::entered`].
pub struct RequestSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for RequestSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RequestSpanGuard(..)")
	}
}

// Debug events the hot paths emit without owning a span guard.
pub(crate) fn note_retry(attempt: u32, delay_ms: u64, status: u16) {
	#[cfg(feature = "tracing")]
	tracing::debug!(attempt, delay_ms, status, "Retrying API request after backoff.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (attempt, delay_ms, status);
	}
}

pub(crate) fn note_refresh(grant: GrantStep) {
	#[cfg(feature = "tracing")]
	tracing::debug!(grant = grant.as_str(), "Stored a fresh access token.");
	#[cfg(not(feature = "tracing"))]
	{
		let _ = grant;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_span_noop_without_tracing() {
		let _guard = RequestSpan::request("get", "/v1/me").entered();
		// Compile-time smoke test ensures the guard exists even when tracing is disabled.
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::exchange(GrantStep::RefreshToken);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
