//! Typed session view over a raw [`SessionStore`].

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret, UserProfile},
	obs,
	store::{SessionKey, SessionStore, StoreError},
};

/// Typed accessor for the session entries.
///
/// Reads never yield half a token pair: if only one of the two tokens is stored the vault clears
/// the session and reports it as absent.
#[derive(Clone)]
pub struct SessionVault {
	store: Arc<dyn SessionStore>,
}
impl SessionVault {
	/// Wraps the provided backend.
	pub fn new(store: Arc<dyn SessionStore>) -> Self {
		Self { store }
	}

	/// Returns the underlying backend.
	pub fn store(&self) -> &Arc<dyn SessionStore> {
		&self.store
	}

	/// Loads the stored token pair.
	pub async fn credentials(&self) -> Result<Option<TokenPair>> {
		let access = self.store.get(SessionKey::AccessToken).await?;
		let refresh = self.store.get(SessionKey::RefreshToken).await?;

		match (access, refresh) {
			(Some(access), Some(refresh)) => Ok(Some(TokenPair::new(access, refresh))),
			(None, None) => Ok(None),
			_ => {
				obs::record_half_session();
				self.clear().await?;

				Ok(None)
			},
		}
	}

	/// Returns the access token of the stored pair.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.credentials().await?.map(|pair| pair.access_token))
	}

	/// Returns the refresh token of the stored pair.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.credentials().await?.map(|pair| pair.refresh_token))
	}

	/// Returns `true` when a complete token pair is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.credentials().await?.is_some())
	}

	/// Decodes the stored profile.
	pub async fn profile(&self) -> Result<Option<UserProfile>> {
		let Some(raw) = self.store.get(SessionKey::UserProfile).await? else {
			return Ok(None);
		};
		let profile = serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
			message: format!("Stored user profile is malformed: {e}"),
		})?;

		Ok(Some(profile))
	}

	/// Persists a freshly issued token pair together with the signed-in profile.
	pub async fn save_login(&self, tokens: &TokenPair, profile: &UserProfile) -> Result<()> {
		let encoded = serde_json::to_string(profile).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode user profile: {e}"),
		})?;

		self.save_tokens(tokens).await?;
		self.store.set(SessionKey::UserProfile, encoded).await?;

		Ok(())
	}

	/// Persists both tokens.
	pub async fn save_tokens(&self, tokens: &TokenPair) -> Result<()> {
		self.store.set(SessionKey::AccessToken, tokens.access_token.expose().to_owned()).await?;
		self.store.set(SessionKey::RefreshToken, tokens.refresh_token.expose().to_owned()).await?;

		Ok(())
	}

	/// Replaces the access token after a refresh; the refresh token is left untouched.
	pub async fn replace_access_token(&self, token: TokenSecret) -> Result<()> {
		self.store.set(SessionKey::AccessToken, token.into_inner()).await?;

		Ok(())
	}

	/// Removes every session entry. All removals are attempted; the first failure is returned.
	pub async fn clear(&self) -> Result<()> {
		let mut first_err = None;

		for key in SessionKey::ALL {
			if let Err(e) = self.store.remove(key).await {
				first_err.get_or_insert(e);
			}
		}

		match first_err {
			Some(e) => Err(e.into()),
			None => Ok(()),
		}
	}
}
impl Debug for SessionVault {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SessionVault(..)")
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{auth::UserRole, store::MemoryStore};

	fn profile() -> UserProfile {
		UserProfile {
			id: "u-7".into(),
			name: "Budi".into(),
			email: "budi@example.com".into(),
			role: UserRole::User,
			created_at: macros::datetime!(2025-02-02 10:00 UTC),
			last_login: Some(macros::datetime!(2025-02-03 09:30 UTC)),
		}
	}

	#[tokio::test]
	async fn login_round_trip_and_clear() {
		let backend = MemoryStore::default();
		let vault = SessionVault::new(Arc::new(backend.clone()));

		vault
			.save_login(&TokenPair::new("tok-1", "ref-1"), &profile())
			.await
			.expect("Saving a login should succeed.");

		assert_eq!(backend.len(), 3);
		assert!(vault.is_authenticated().await.expect("Credential lookup should succeed."));
		assert_eq!(
			vault.profile().await.expect("Profile lookup should succeed."),
			Some(profile())
		);

		vault
			.replace_access_token(TokenSecret::new("tok-2"))
			.await
			.expect("Access token replacement should succeed.");

		let pair = vault
			.credentials()
			.await
			.expect("Credential lookup should succeed.")
			.expect("Credentials should remain present.");

		assert_eq!(pair.access_token.expose(), "tok-2");
		assert_eq!(pair.refresh_token.expose(), "ref-1");

		vault.clear().await.expect("Clearing the session should succeed.");

		assert!(backend.is_empty());
		assert!(!vault.is_authenticated().await.expect("Credential lookup should succeed."));
	}

	#[tokio::test]
	async fn half_populated_pair_is_discarded() {
		let backend = MemoryStore::default();
		let vault = SessionVault::new(Arc::new(backend.clone()));

		backend
			.set(SessionKey::AccessToken, "orphan".into())
			.await
			.expect("Seeding an orphan access token should succeed.");

		assert!(vault.access_token().await.expect("Lookup should succeed.").is_none());
		assert!(backend.is_empty(), "Orphaned entries must be cleared.");
	}

	#[tokio::test]
	async fn malformed_profile_is_a_storage_error() {
		let backend = MemoryStore::default();
		let vault = SessionVault::new(Arc::new(backend.clone()));

		backend
			.set(SessionKey::UserProfile, "{".into())
			.await
			.expect("Seeding a malformed profile should succeed.");

		let err = vault.profile().await.expect_err("Malformed profile should fail to decode.");

		assert!(matches!(err, Error::Storage(StoreError::Serialization { .. })));
	}
}
