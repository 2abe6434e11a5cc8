//! Transport primitives for API calls.
//!
//! [`ApiHttpClient`] is the client's only dependency on an HTTP stack. The pipeline hands it a
//! fully resolved [`HttpRequest`] (absolute URL, headers, encoded body, optional deadline) and
//! expects back the raw status and body; every non-transport outcome, including 4xx and 5xx
//! statuses, must be returned as `Ok(HttpResponse)` so the pipeline can classify it.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of the client, and the futures they return must be `Send` so pipeline futures can hop
/// executors.
///
/// Implementations must honour [`HttpRequest::timeout`] and fail the call once it elapses,
/// preferably classified as [`TransportError::Timeout`]. The pipeline does not enforce the
/// deadline itself: the refresh call relies on it, and a transport that ignores it leaves every
/// caller waiting on that refresh suspended for as long as the server takes to answer.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with whatever status the server answered.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;

	/// Classifies a transport failure. Override to surface timeouts distinctly.
	fn classify(&self, error: Self::TransportError) -> TransportError {
		TransportError::network(error)
	}
}

/// HTTP verbs used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
}
impl Method {
	/// Returns the verb as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to the transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
	/// Verb.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Encoded body, if any.
	pub body: Option<Vec<u8>>,
	/// Per-request deadline; the transport fails the call once it elapses.
	pub timeout: Option<Duration>,
}
impl HttpRequest {
	/// Returns the first header value matching `name` (ASCII case-insensitive).
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Raw response returned by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Builds a response with the provided status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}
			if let Some(timeout) = request.timeout.and_then(|t| std::time::Duration::try_from(t).ok())
			{
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}

	fn classify(&self, error: Self::TransportError) -> TransportError {
		error.into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let request = HttpRequest {
			method: Method::Get,
			url: Url::parse("http://localhost/api/v1/damaged-roads").expect("URL should parse."),
			headers: vec![("Authorization".into(), "Bearer tok".into())],
			body: None,
			timeout: None,
		};

		assert_eq!(request.header("authorization"), Some("Bearer tok"));
		assert_eq!(request.header("x-missing"), None);
		assert!(HttpResponse::new(204, Vec::new()).is_success());
		assert!(!HttpResponse::new(401, Vec::new()).is_success());
	}

	#[test]
	fn methods_cover_the_api_verbs() {
		let labels = [Method::Get, Method::Post, Method::Put].map(|method| match method {
			Method::Get | Method::Post | Method::Put => method.to_string(),
		});

		assert_eq!(labels, ["GET", "POST", "PUT"]);
	}
}
