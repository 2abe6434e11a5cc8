//! Single-flight session refresh.
//!
//! The first caller that needs a new access token installs a [`RefreshFlight`] in the client's
//! slot and drives the `POST /auth/refresh` call; everyone arriving while it is pending awaits the
//! same flight and receives the same token or the same failure. The driver removes the flight
//! from the slot once the call settles, so the next 401 starts a new refresh.
//!
//! A failed refresh ends the session: storage is cleared before any waiter is released, and every
//! waiter observes [`Error::SessionExpired`] carrying one shared cause. A driver that is dropped
//! mid-call also empties the slot; a caller still waiting on the abandoned flight takes over and
//! finishes it.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use async_lock::OnceCell;
// self
use crate::{
	_prelude::*,
	api::{self, RefreshTokenRequest, RefreshTokenResponse},
	auth::TokenSecret,
	http::ApiHttpClient,
	obs::{self, OpKind},
	pipeline::{ApiClient, ApiRequest},
};

type RefreshOutcome = Result<TokenSecret, Arc<Error>>;

/// Shared pending result of one refresh call.
#[derive(Debug)]
pub(crate) struct RefreshFlight {
	outcome: OnceCell<RefreshOutcome>,
}
impl RefreshFlight {
	fn new() -> Self {
		Self { outcome: OnceCell::new() }
	}
}

/// Holds the flight currently in progress, if any.
#[derive(Clone, Debug, Default)]
pub(crate) struct FlightSlot(Arc<Mutex<Option<Arc<RefreshFlight>>>>);
impl FlightSlot {
	/// Returns the pending flight, installing a new one when the slot is empty. The flag is
	/// `true` when the caller joined an existing flight.
	fn join_or_start(&self) -> (Arc<RefreshFlight>, bool) {
		let mut slot = self.0.lock();

		if let Some(flight) = &*slot {
			return (flight.clone(), true);
		}

		let flight = Arc::new(RefreshFlight::new());

		*slot = Some(flight.clone());

		(flight, false)
	}

	/// Empties the slot if it still holds `flight`.
	fn release(&self, flight: &Arc<RefreshFlight>) {
		let mut slot = self.0.lock();

		if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, flight)) {
			*slot = None;
		}
	}

	pub(crate) fn is_pending(&self) -> bool {
		self.0.lock().is_some()
	}
}

/// Empties the slot when the driving future settles or is dropped mid-call.
struct FlightRelease<'a> {
	slot: &'a FlightSlot,
	flight: &'a Arc<RefreshFlight>,
}
impl Drop for FlightRelease<'_> {
	fn drop(&mut self) {
		self.slot.release(self.flight);
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Obtains a new access token, sharing one refresh call among all concurrent callers.
	///
	/// Fails with [`Error::SessionExpired`] when no refresh token is stored or the refresh
	/// endpoint rejects it; the session has been cleared by then.
	pub async fn refresh_session(&self) -> Result<TokenSecret> {
		let (flight, joined) = self.in_flight.join_or_start();

		if joined {
			self.refresh_metrics.record_joined();
			obs::record_refresh_joined();
		}

		let outcome = flight.outcome.get_or_init(|| self.drive_refresh(&flight)).await.clone();

		outcome.map_err(|cause| Error::SessionExpired { cause })
	}

	async fn drive_refresh(&self, flight: &Arc<RefreshFlight>) -> RefreshOutcome {
		let _release = FlightRelease { slot: &self.in_flight, flight };

		self.refresh_metrics.record_attempt();

		let result = obs::observe(OpKind::Refresh, "refresh_session", self.call_refresh()).await;

		match result {
			Ok(token) => {
				self.refresh_metrics.record_success();

				Ok(token)
			},
			Err(err) => {
				self.refresh_metrics.record_failure();

				let cause = Arc::new(err);

				self.force_logout(&cause).await;

				Err(cause)
			},
		}
	}

	async fn call_refresh(&self) -> Result<TokenSecret> {
		let refresh_token = self.session.refresh_token().await?.ok_or(Error::NoSession)?;
		let request = ApiRequest::post(api::REFRESH_PATH)
			.json(&RefreshTokenRequest { refresh_token: refresh_token.expose().to_owned() })?
			.with_timeout(self.config.refresh_timeout);
		let response: RefreshTokenResponse = self.send(&request, None).await?.json()?;
		let token = TokenSecret::new(response.access_token);

		self.session.replace_access_token(token.clone()).await?;

		Ok(token)
	}
}
