//! Outbound request records and decoded responses.

// self
use crate::{
	_prelude::*,
	api::ErrorResponse,
	error::{ConfigError, DecodeError},
	http::Method,
};

/// Logical API request, expressed relative to the configured base URL.
///
/// Callers never set `Authorization`; the pipeline owns that header. The retried marker is
/// one-shot: once set, a 401 on this request is returned to the caller as-is.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// Verb.
	pub method: Method,
	/// Path relative to the base URL, e.g. `/damaged-roads/42`.
	pub path: String,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Extra headers.
	pub headers: Vec<(String, String)>,
	/// JSON-encoded body.
	pub body: Option<Vec<u8>>,
	/// Per-request deadline.
	pub timeout: Option<Duration>,
	retried: bool,
	recover_session: bool,
}
impl ApiRequest {
	/// Creates a request with no body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
			timeout: None,
			retried: false,
			recover_session: true,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(ConfigError::Serialize)?);

		Ok(self)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a header. `Authorization` is overwritten by the pipeline.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets a per-request deadline.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Returns 401 responses unchanged instead of refreshing the session.
	///
	/// Used for credential endpoints (login, registration, password reset) where a 401 means
	/// "wrong credentials" rather than "expired session".
	pub fn without_session_recovery(mut self) -> Self {
		self.recover_session = false;

		self
	}

	/// Returns `true` once the request has been re-dispatched after a refresh.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	/// Sets the one-shot retried marker.
	pub fn mark_retried(&mut self) {
		self.retried = true;
	}

	pub(crate) fn recovers_session(&self) -> bool {
		self.recover_session && !self.retried
	}
}

/// Successful (2xx) response, body returned verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
	/// Path that produced the response.
	pub path: String,
}
impl ApiResponse {
	/// Decodes the body as JSON, reporting the failing field path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			DecodeError { endpoint: self.path.clone(), status: self.status, source }.into()
		})
	}
}

/// Builds the error for a non-2xx response, keeping the documented error payload when present.
pub(crate) fn api_error(status: u16, body: &[u8]) -> Error {
	Error::Api { status, body: serde_json::from_slice::<ErrorResponse>(body).ok() }
}
