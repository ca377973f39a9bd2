//! Engine facade.
//!
//! The two operations call sites use: [`Engine::evaluate`] runs one full
//! round and commits on agreement, [`Engine::read`] returns the last
//! committed canonical value. Overlapping rounds on the same fingerprint
//! are serialized through a per-key lock so two commits never interleave;
//! rounds on distinct fingerprints run fully independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::RoundConfig;
use crate::error::{AccordError, Result};
use crate::gate;
use crate::judge::{Judge, NoJudge};
use crate::producer::Producer;
use crate::round::run_round;
use crate::store::ResultStore;
use crate::types::{CommitResult, ComparatorSpec, Fingerprint, Output};

/// Reconciliation engine over a result store and an optional judge.
pub struct Engine<S, J = NoJudge> {
    store: S,
    judge: J,
    config: RoundConfig,
    /// Monotone commit stamp source
    sequence: AtomicU64,
    /// Per-fingerprint round serialization
    locks: Mutex<HashMap<Fingerprint, Arc<Mutex<()>>>>,
}

impl<S: ResultStore> Engine<S> {
    /// Engine with default config and no judge; semantically judged
    /// comparisons will count as Different.
    pub fn new(store: S) -> Self {
        Self::with_judge(store, NoJudge)
    }
}

impl<S: ResultStore, J: Judge> Engine<S, J> {
    /// Engine with an explicit judge for semantically judged rounds.
    pub fn with_judge(store: S, judge: J) -> Self {
        Self {
            store,
            judge,
            config: RoundConfig::default(),
            sequence: AtomicU64::new(0),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the round configuration.
    pub fn with_config(mut self, config: RoundConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one full round for `fingerprint` and commit on agreement.
    ///
    /// Never errors for producer or comparator trouble; inspect the
    /// returned [`CommitResult`] (or re-read the stored value) to learn
    /// whether a commit occurred. Errors only for invalid parameters or
    /// an unavailable store.
    pub async fn evaluate(
        &self,
        fingerprint: &Fingerprint,
        producer: Arc<dyn Producer>,
        spec: ComparatorSpec,
    ) -> Result<CommitResult> {
        self.config.validate()?;
        self.evaluate_with(
            fingerprint,
            producer,
            spec,
            self.config.executors,
            Duration::from_millis(self.config.slot_timeout_ms),
        )
        .await
    }

    /// [`Engine::evaluate`] with per-call executor count and slot deadline.
    pub async fn evaluate_with(
        &self,
        fingerprint: &Fingerprint,
        producer: Arc<dyn Producer>,
        spec: ComparatorSpec,
        executors: usize,
        slot_deadline: Duration,
    ) -> Result<CommitResult> {
        let key_lock = self.key_lock(fingerprint).await;
        let serialized = key_lock.lock().await;

        let result = match run_round(
            fingerprint,
            producer,
            &spec,
            &self.judge,
            executors,
            slot_deadline,
        )
        .await
        {
            Ok(outcome) => {
                let committed_at = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                gate::commit(&self.store, fingerprint, outcome, committed_at)
                    .await
                    .map_err(AccordError::from)
            }
            Err(err) => Err(err),
        };

        drop(serialized);
        drop(key_lock);
        self.sweep_key_lock(fingerprint).await;
        result
    }

    /// Last committed canonical value, or `None` if never committed.
    pub async fn read(&self, fingerprint: &Fingerprint) -> Result<Option<Output>> {
        let record = self.store.get(fingerprint).await?;
        Ok(record.map(|r| r.value))
    }

    /// Last committed canonical value, or the caller's default on miss.
    pub async fn read_or(&self, fingerprint: &Fingerprint, default: Output) -> Result<Output> {
        Ok(self.read(fingerprint).await?.unwrap_or(default))
    }

    /// The lock serializing rounds on one fingerprint.
    async fn key_lock(&self, fingerprint: &Fingerprint) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(
            locks
                .entry(fingerprint.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drop a fingerprint's lock entry once no round holds or awaits it.
    ///
    /// Strong count 1 means only the registry still holds the entry: any
    /// concurrent round cloned the `Arc` before releasing the registry
    /// lock, so a contended key is never removed.
    async fn sweep_key_lock(&self, fingerprint: &Fingerprint) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(fingerprint) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(fingerprint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::ProduceError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct Fixed(Output);

    #[async_trait]
    impl Producer for Fixed {
        async fn produce(&self, _slot: usize) -> std::result::Result<Output, ProduceError> {
            Ok(self.0.clone())
        }
    }

    fn fp(id: &str) -> Fingerprint {
        Fingerprint::new(id).expect("fingerprint")
    }

    #[tokio::test]
    async fn read_or_returns_default_on_miss() {
        let engine = Engine::new(MemoryStore::new());
        let value = engine
            .read_or(&fp("unseen"), Output::Text("NONE".to_string()))
            .await
            .expect("read");
        assert_eq!(value, Output::Text("NONE".to_string()));
    }

    #[tokio::test]
    async fn commit_stamps_are_monotone() {
        let engine = Engine::new(MemoryStore::new());
        let producer = Arc::new(Fixed(Output::Bool(true)));

        for _ in 0..3 {
            engine
                .evaluate(&fp("flag"), producer.clone(), ComparatorSpec::Strict)
                .await
                .expect("evaluate");
        }

        let record = engine
            .store
            .get(&fp("flag"))
            .await
            .expect("get")
            .expect("record");
        assert_eq!(record.committed_at, 3);
    }

    #[tokio::test]
    async fn idle_key_locks_are_swept() {
        let engine = Engine::new(MemoryStore::new());
        let producer = Arc::new(Fixed(Output::Bool(true)));

        engine
            .evaluate(&fp("first"), producer.clone(), ComparatorSpec::Strict)
            .await
            .expect("evaluate");
        engine
            .evaluate(&fp("second"), producer, ComparatorSpec::Strict)
            .await
            .expect("evaluate");

        assert!(engine.locks.lock().await.is_empty());
    }
}
