//! Client-level error types shared across the pipeline, stores, and endpoint wrappers.

// self
use crate::{_prelude::*, api::ErrorResponse};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Upstream answered with a non-success status the pipeline does not recover from.
	#[error("API responded with HTTP {status}{}.", describe_body(.body.as_ref()))]
	Api {
		/// HTTP status code.
		status: u16,
		/// Parsed error payload, when the body matched the documented shape.
		body: Option<ErrorResponse>,
	},
	/// No usable session is stored (missing refresh token or profile).
	#[error("No session is available; log in first.")]
	NoSession,
	/// The session was torn down after an unrecoverable authentication failure.
	///
	/// Callers should treat this as a forced logout and send the user back to the login entry
	/// point. Every waiter of a failed refresh observes the same `cause`.
	#[error("Session expired and has been cleared.")]
	SessionExpired {
		/// Failure that ended the session.
		#[source]
		cause: Arc<Error>,
	},
}
impl Error {
	/// Returns `true` when the caller must route the user to the login entry point.
	pub fn requires_login(&self) -> bool {
		matches!(self, Self::SessionExpired { .. } | Self::NoSession)
	}

	/// Returns the upstream HTTP status for [`Error::Api`], or for the cause of a forced logout.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			Self::SessionExpired { cause } => cause.status(),
			_ => None,
		}
	}

	pub(crate) fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Api { status: 401, .. })
	}
}

fn describe_body(body: Option<&ErrorResponse>) -> String {
	match body {
		Some(ErrorResponse { error, message: Some(message), .. }) => format!(" ({error}: {message})"),
		Some(ErrorResponse { error, .. }) => format!(" ({error})"),
		None => String::new(),
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// Request path is not a valid location under the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path or path segment.
		path: String,
		/// Underlying parsing failure, when the path was rejected by the URL parser.
		#[source]
		source: Option<url::ParseError>,
	},
	/// Refresh timeout must be strictly positive.
	#[error("Refresh timeout must be positive.")]
	NonPositiveTimeout,
	/// Environment variable holds a value that cannot be parsed.
	#[error("Environment variable {name} is invalid: {value}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request did not complete before its deadline.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Malformed response payload.
#[derive(Debug, ThisError)]
#[error("Response from {endpoint} is malformed at `{}`.", .source.path())]
pub struct DecodeError {
	/// Endpoint path that produced the body.
	pub endpoint: String,
	/// HTTP status code of the response.
	pub status: u16,
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
