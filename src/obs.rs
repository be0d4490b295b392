//! Optional observability helpers for the request and token-exchange paths.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `propwise_sdk.request` (with `verb` +
//!   `method` fields) and `propwise_sdk.exchange` (with the `grant` field), plus debug events
//!   for retries and refreshes.
//! - Enable `metrics` to increment the `propwise_sdk_request_total` and
//!   `propwise_sdk_token_exchange_total` counters, labeled by outcome (and grant).
//!
//! Independent of both features, every client carries an always-on [`RequestMetrics`] snapshot
//! with process-local atomic counters.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatched API request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Terminal success.
	Success,
	/// Retryable response; the loop will go around again.
	Retry,
	/// Terminal failure propagated to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Success => "success",
			RequestOutcome::Retry => "retry",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each token-endpoint exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Entry to a grant exchange.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the orchestrator.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Thread-safe counters every client keeps about its own traffic.
#[derive(Debug, Default)]
pub struct RequestMetrics {
	attempts: AtomicU64,
	retries: AtomicU64,
	refreshes: AtomicU64,
	failures: AtomicU64,
}
impl RequestMetrics {
	/// Returns the total number of dispatched attempts, retries included.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of attempts that came back retryable.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns the number of token refreshes the orchestrator performed.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that ended in a terminal failure.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
