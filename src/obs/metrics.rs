// self
use crate::obs::{OpKind, OpOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"roadwatch_client_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a forced logout via the global metrics recorder (when enabled).
pub fn record_forced_logout_metric() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("roadwatch_client_forced_logout_total").increment(1);
	}
}
