// self
use crate::{
	grant::GrantStep,
	obs::{ExchangeOutcome, RequestOutcome},
};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("propwise_sdk_request_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a token-exchange outcome via the global metrics recorder (when enabled).
pub fn record_token_exchange(grant: GrantStep, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"propwise_sdk_token_exchange_total",
			"grant" => grant.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (grant, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_request_outcome(RequestOutcome::Retry);
		record_token_exchange(GrantStep::RefreshToken, ExchangeOutcome::Failure);
	}
}
