//! Misbehaving stores.

use async_trait::async_trait;

use accord::{Fingerprint, ResultStore, StoreError, StoredRecord};

/// A store whose backend is always down. Exercises the one error path
/// that must propagate to callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

#[async_trait]
impl ResultStore for UnavailableStore {
    async fn get(&self, _fingerprint: &Fingerprint) -> Result<Option<StoredRecord>, StoreError> {
        Err(StoreError::Unavailable("backend down".to_string()))
    }

    async fn put(&self, _record: StoredRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("backend down".to_string()))
    }
}
