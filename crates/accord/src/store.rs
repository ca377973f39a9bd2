//! Result store capability and in-memory backend.
//!
//! The store is a keyed persistent map from fingerprint to the last
//! committed canonical value. Absence of a record means "never
//! successfully committed". Only the commit gate writes to it.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{Fingerprint, StoredRecord};

/// Durable keyed map supplied by the caller's persistence boundary.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Last committed record for a fingerprint, if any.
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<StoredRecord>, StoreError>;

    /// Unconditional upsert; later commits overwrite earlier ones.
    async fn put(&self, record: StoredRecord) -> Result<(), StoreError>;
}

/// In-process store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Fingerprint, StoredRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self.records.read().await.get(fingerprint).cloned())
    }

    async fn put(&self, record: StoredRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.fingerprint.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Output;

    fn record(id: &str, value: Output, committed_at: u64) -> StoredRecord {
        StoredRecord {
            fingerprint: Fingerprint::new(id).expect("fingerprint"),
            value,
            committed_at,
        }
    }

    #[tokio::test]
    async fn get_on_missing_key_is_none() {
        let store = MemoryStore::new();
        let key = Fingerprint::new("never-committed").expect("fingerprint");
        assert_eq!(store.get(&key).await, Ok(None));
    }

    #[tokio::test]
    async fn put_overwrites_unconditionally() {
        let store = MemoryStore::new();
        let key = Fingerprint::new("eur-rate").expect("fingerprint");

        store
            .put(record("eur-rate", Output::Number(0.92), 1))
            .await
            .expect("put");
        store
            .put(record("eur-rate", Output::Number(0.93), 2))
            .await
            .expect("put");

        let stored = store.get(&key).await.expect("get").expect("record");
        assert_eq!(stored.value, Output::Number(0.93));
        assert_eq!(stored.committed_at, 2);
    }

    #[tokio::test]
    async fn distinct_fingerprints_independent() {
        let store = MemoryStore::new();
        store
            .put(record("a", Output::Bool(true), 1))
            .await
            .expect("put");
        store
            .put(record("b", Output::Bool(false), 2))
            .await
            .expect("put");

        let a = Fingerprint::new("a").expect("fingerprint");
        let b = Fingerprint::new("b").expect("fingerprint");
        assert_eq!(
            store.get(&a).await.expect("get").expect("record").value,
            Output::Bool(true)
        );
        assert_eq!(
            store.get(&b).await.expect("get").expect("record").value,
            Output::Bool(false)
        );
    }
}
