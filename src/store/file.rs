//! File-backed [`SessionStore`] so a signed-in session survives process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{SessionKey, SessionStore, StoreError, StoreFuture},
};

type Snapshot = BTreeMap<String, String>;

/// Persists session entries to a JSON object file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(Snapshot::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Snapshot::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	// Write to a sibling temp file, then rename, so a crash never leaves a torn snapshot.
	fn persist_locked(&self, contents: &Snapshot) -> Result<(), StoreError> {
		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SessionStore for FileStore {
	fn get(&self, key: SessionKey) -> StoreFuture<'_, Option<String>> {
		Box::pin(async move { Ok(self.inner.read().get(key.as_str()).cloned()) })
	}

	fn set(&self, key: SessionKey, value: String) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.insert(key.as_str().to_owned(), value);
			self.persist_locked(&guard)
		})
	}

	fn remove(&self, key: SessionKey) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			if guard.remove(key.as_str()).is_some() {
				self.persist_locked(&guard)?;
			}

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"roadwatch_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn entries_survive_reopen_and_removal_persists() {
		let path = temp_path();
		let store = FileStore::open(&path).expect("Failed to open file store.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.set(SessionKey::AccessToken, "tok-1".into()))
			.expect("Failed to write access token.");
		rt.block_on(store.set(SessionKey::RefreshToken, "ref-1".into()))
			.expect("Failed to write refresh token.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store.");

		assert_eq!(
			rt.block_on(reopened.get(SessionKey::AccessToken))
				.expect("Failed to read access token."),
			Some("tok-1".into())
		);

		rt.block_on(reopened.remove(SessionKey::AccessToken))
			.expect("Failed to remove access token.");
		drop(reopened);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store again.");

		assert_eq!(
			rt.block_on(reopened.get(SessionKey::AccessToken)).expect("Failed to read entry."),
			None
		);
		assert_eq!(
			rt.block_on(reopened.get(SessionKey::RefreshToken)).expect("Failed to read entry."),
			Some("ref-1".into())
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_reported() {
		let path = temp_path();

		fs::write(&path, b"not json").expect("Failed to seed corrupt snapshot.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot should fail to open.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).expect("Failed to remove corrupt snapshot.");
	}
}
