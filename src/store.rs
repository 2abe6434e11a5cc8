//! Durable session storage contracts and built-in store implementations.
//!
//! Sessions live in three independent string entries (see [`SessionKey`]) so any key-value
//! backend can hold them. [`SessionVault`] layers the typed view on top and keeps the token-pair
//! invariant: both tokens are present or neither is.

pub mod file;
pub mod memory;
pub mod vault;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use vault::SessionVault;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value backend holding the session entries.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the entry stored under `key`, if present.
	fn get(&self, key: SessionKey) -> StoreFuture<'_, Option<String>>;

	/// Writes or replaces the entry stored under `key`.
	fn set(&self, key: SessionKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes the entry stored under `key`; missing entries are not an error.
	fn remove(&self, key: SessionKey) -> StoreFuture<'_, ()>;
}

/// The three entries that make up a persisted session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
	/// Current access token.
	AccessToken,
	/// Refresh token issued at login.
	RefreshToken,
	/// JSON-encoded [`UserProfile`](crate::auth::UserProfile).
	UserProfile,
}
impl SessionKey {
	/// Every session key, in teardown order.
	pub const ALL: [SessionKey; 3] = [Self::AccessToken, Self::RefreshToken, Self::UserProfile];

	/// Returns the storage key string.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::RefreshToken => "refresh_token",
			Self::UserProfile => "user_profile",
		}
	}
}
impl Display for SessionKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend or the vault.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk full"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn session_keys_use_storage_names() {
		let names: Vec<_> = SessionKey::ALL.iter().map(|key| key.as_str()).collect();

		assert_eq!(names, ["access_token", "refresh_token", "user_profile"]);
		assert_eq!(
			serde_json::to_string(&SessionKey::UserProfile).expect("Key should serialize."),
			"\"user_profile\""
		);
	}
}
