//! Authenticated request pipeline: bearer attachment, 401 recovery, and session teardown.
//!
//! [`ApiClient::dispatch`] reads the stored access token, attaches it, and sends the request. A
//! 401 on a request that has not been retried yet joins (or starts) the single in-flight
//! refresh, re-attaches the new token, and re-sends exactly once. Failures inside that recovery
//! path clear the stored session and surface as [`Error::SessionExpired`]; every other failure is
//! returned unchanged with no session mutation.

pub mod refresh;
pub mod request;

pub use refresh::RefreshMetrics;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::{SessionState, TokenSecret},
	config::ClientConfig,
	http::{ApiHttpClient, HttpRequest},
	obs::{self, OpKind},
	store::{SessionStore, SessionVault},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Callback invoked after a forced logout, e.g. to route the user to the login screen.
pub type LogoutHook = Arc<dyn Fn(&Error) + Send + Sync>;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Entry point for every API call.
///
/// Cloning is cheap and clones share the transport, the session store, the refresh metrics, and
/// the in-flight refresh slot, so concurrent callers on any clone coalesce onto one refresh.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Base URL and deadlines.
	pub config: ClientConfig,
	/// Typed view of the injected session store.
	pub session: SessionVault,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	logout_hook: Option<LogoutHook>,
	in_flight: refresh::FlightSlot,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn SessionStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			config,
			session: SessionVault::new(store),
			refresh_metrics: Default::default(),
			logout_hook: None,
			in_flight: Default::default(),
		}
	}

	/// Registers a callback fired after every forced logout.
	pub fn with_logout_hook<F>(mut self, hook: F) -> Self
	where
		F: 'static + Fn(&Error) + Send + Sync,
	{
		self.logout_hook = Some(Arc::new(hook));

		self
	}

	/// Sends `request` with the stored bearer token, recovering once from an expired session.
	pub async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse> {
		obs::observe(OpKind::Dispatch, "dispatch", async move {
			let token = self.session.access_token().await?;

			match self.send(&request, token.as_ref()).await {
				Err(err) if err.is_unauthorized() && request.recovers_session() =>
					self.retry_with_refreshed_session(request).await,
				other => other,
			}
		})
		.await
	}

	/// Dispatches `request` and decodes the JSON body.
	pub async fn dispatch_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.dispatch(request).await?.json()
	}

	/// Returns `true` when a complete token pair is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		self.session.is_authenticated().await
	}

	/// Reports where the session currently sits in its lifecycle.
	pub async fn session_state(&self) -> Result<SessionState> {
		if self.in_flight.is_pending() {
			return Ok(SessionState::RefreshPending);
		}
		if self.session.is_authenticated().await? {
			Ok(SessionState::Authenticated)
		} else {
			Ok(SessionState::Anonymous)
		}
	}

	async fn retry_with_refreshed_session(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		let token = self.refresh_session().await?;

		request.mark_retried();
		obs::record_retry(&request.path);

		match self.send(&request, Some(&token)).await {
			Ok(response) => Ok(response),
			Err(err) => {
				let cause = Arc::new(err);

				self.force_logout(&cause).await;

				Err(Error::SessionExpired { cause })
			},
		}
	}

	/// Sends a single attempt; non-2xx statuses become [`Error::Api`].
	pub(crate) async fn send(
		&self,
		request: &ApiRequest,
		token: Option<&TokenSecret>,
	) -> Result<ApiResponse> {
		let mut url = self.config.endpoint(&request.path)?;

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		let mut headers: Vec<(String, String)> = request
			.headers
			.iter()
			.filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
			.cloned()
			.collect();

		headers.push(("Accept".into(), "application/json".into()));

		if request.body.is_some() {
			headers.push(("Content-Type".into(), "application/json".into()));
		}
		if let Some(token) = token {
			headers.push(("Authorization".into(), token.bearer()));
		}

		let http_request = HttpRequest {
			method: request.method,
			url,
			headers,
			body: request.body.clone(),
			timeout: request.timeout,
		};
		let response = self
			.http_client
			.execute(http_request)
			.await
			.map_err(|e| Error::from(self.http_client.classify(e)))?;

		if response.is_success() {
			Ok(ApiResponse { status: response.status, body: response.body, path: request.path.clone() })
		} else {
			Err(request::api_error(response.status, &response.body))
		}
	}

	/// Clears every session entry and notifies observers. Idempotent.
	pub(crate) async fn force_logout(&self, cause: &Error) {
		if let Err(e) = self.session.clear().await {
			obs::record_clear_failure(&e);
		}

		obs::record_forced_logout(cause);

		if let Some(hook) = &self.logout_hook {
			hook(cause);
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_http_client(config, store, ReqwestHttpClient::default())
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			session: self.session.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			logout_hook: self.logout_hook.clone(),
			in_flight: self.in_flight.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_pending", &self.in_flight.is_pending())
			.field("logout_hook_set", &self.logout_hook.is_some())
			.finish()
	}
}
