// self
use crate::{_prelude::*, obs::OpKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by pipeline operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("roadwatch_client.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
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

/// Logs and counts a forced logout caused by `cause`.
pub fn record_forced_logout(cause: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %cause, "session torn down after unrecoverable auth failure");
	#[cfg(not(feature = "tracing"))]
	let _ = cause;

	super::record_forced_logout_metric();
}

/// Logs that session storage could not be cleared during a forced logout.
pub fn record_clear_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::error!(%error, "failed to clear session storage during forced logout");
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Logs that a refresh caller joined an already running refresh.
pub fn record_refresh_joined() {
	#[cfg(feature = "tracing")]
	tracing::debug!("joined in-flight session refresh");
}

/// Logs that storage held only one half of the token pair.
pub fn record_half_session() {
	#[cfg(feature = "tracing")]
	tracing::warn!("session storage held a partial token pair; clearing it");
}

/// Logs that a request is being retried with a refreshed token.
pub fn record_retry(path: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(path, "retrying request with refreshed access token");
	#[cfg(not(feature = "tracing"))]
	let _ = path;
}
