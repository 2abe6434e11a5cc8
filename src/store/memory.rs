//! Thread-safe in-memory [`SessionStore`] for tests, CLIs, and short-lived processes.

// self
use crate::{
	_prelude::*,
	store::{SessionKey, SessionStore, StoreError, StoreFuture},
};

type EntryMap = Arc<RwLock<HashMap<SessionKey, String>>>;

/// Keeps session entries in-process; cloning shares the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(EntryMap);
impl MemoryStore {
	/// Returns the number of populated entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no entry is populated.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Synchronous read used by assertions and diagnostics.
	pub fn peek(&self, key: SessionKey) -> Option<String> {
		self.0.read().get(&key).cloned()
	}

	fn set_now(map: EntryMap, key: SessionKey, value: String) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}
}
impl SessionStore for MemoryStore {
	fn get(&self, key: SessionKey) -> StoreFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: SessionKey, value: String) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::set_now(map, key, value) })
	}

	fn remove(&self, key: SessionKey) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(&key);

			Ok(())
		})
	}
}
