// self
use crate::{obs::CallbackOutcome, provider::ProviderKind};

/// Records a callback outcome via the global metrics recorder (when enabled).
pub fn record_callback_outcome(provider: ProviderKind, outcome: CallbackOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"nexora_callback_flow_total",
			"provider" => provider.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (provider, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_callback_outcome_noop_without_metrics() {
		record_callback_outcome(ProviderKind::GitHub, CallbackOutcome::Failure);
	}
}
