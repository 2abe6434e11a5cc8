//! Client configuration: API base URL and refresh deadline, built in code or read from the
//! environment.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Default API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
/// Environment variable overriding the API root.
pub const ENV_BASE_URL: &str = "ROADWATCH_API_URL";
/// Environment variable overriding the refresh deadline, in whole seconds.
pub const ENV_REFRESH_TIMEOUT_SECS: &str = "ROADWATCH_REFRESH_TIMEOUT_SECS";

/// Validated settings shared by every request the client issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API root; its path always ends with `/` so endpoint paths append instead of replacing it.
	pub base_url: Url,
	/// Deadline for the refresh call. Expiry fails every waiter and ends the session.
	pub refresh_timeout: Duration,
}
impl ClientConfig {
	const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(30);

	/// Returns a builder seeded with defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Reads [`ENV_BASE_URL`] and [`ENV_REFRESH_TIMEOUT_SECS`]; empty values count as unset.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let mut builder = Self::builder();

		if let Some(url) = read(ENV_BASE_URL) {
			builder = builder.base_url(url.trim());
		}
		if let Some(raw) = read(ENV_REFRESH_TIMEOUT_SECS) {
			let secs = raw.trim().parse::<i64>().map_err(|_| ConfigError::InvalidEnv {
				name: ENV_REFRESH_TIMEOUT_SECS,
				value: raw.clone(),
			})?;

			builder = builder.refresh_timeout(Duration::seconds(secs));
		}

		builder.build()
	}

	/// Resolves an endpoint path (`/auth/login`, `damaged-roads/42`) against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');

		self.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source: Some(source) })
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
	base_url: Option<String>,
	refresh_timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	/// Sets the API root.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Sets the refresh deadline.
	pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = Some(timeout);

		self
	}

	/// Validates the settings and produces a [`ClientConfig`].
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let raw = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
		let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: raw });
		}

		let base_url = normalize(url);
		let refresh_timeout =
			self.refresh_timeout.unwrap_or(ClientConfig::DEFAULT_REFRESH_TIMEOUT);

		if !refresh_timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(ClientConfig { base_url, refresh_timeout })
	}
}

fn normalize(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url.set_query(None);
	url.set_fragment(None);

	url
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_append_to_base_path() {
		let config = ClientConfig::builder().build().expect("Default config should build.");

		assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/v1/");
		assert_eq!(
			config.endpoint("/auth/refresh").expect("Endpoint should resolve.").as_str(),
			"http://localhost:8080/api/v1/auth/refresh"
		);
		assert_eq!(
			config.endpoint("damaged-roads/r-1/status").expect("Endpoint should resolve.").as_str(),
			"http://localhost:8080/api/v1/damaged-roads/r-1/status"
		);
	}

	#[test]
	fn builder_rejects_bad_input() {
		assert!(matches!(
			ClientConfig::builder().base_url("not a url").build(),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			ClientConfig::builder().base_url("ftp://example.com/api").build(),
			Err(ConfigError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			ClientConfig::builder().refresh_timeout(Duration::ZERO).build(),
			Err(ConfigError::NonPositiveTimeout)
		));
	}

	#[test]
	fn lookup_treats_empty_as_unset() {
		let config = ClientConfig::from_lookup(|name| match name {
			ENV_BASE_URL => Some(String::new()),
			ENV_REFRESH_TIMEOUT_SECS => Some("5".into()),
			_ => None,
		})
		.expect("Lookup-based config should build.");

		assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/v1/");
		assert_eq!(config.refresh_timeout, Duration::seconds(5));

		let err = ClientConfig::from_lookup(|name| {
			(name == ENV_REFRESH_TIMEOUT_SECS).then(|| "soon".to_owned())
		})
		.expect_err("Non-numeric timeout should be rejected.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_REFRESH_TIMEOUT_SECS, .. }));
	}
}
