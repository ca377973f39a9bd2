//! Scriptable producers.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use accord::{Output, ProduceError, Producer};

/// Produces the same output for every slot.
#[derive(Debug, Clone)]
pub struct FixedProducer {
    output: Output,
}

impl FixedProducer {
    /// Producer that always yields `output`.
    pub fn new(output: Output) -> Self {
        Self { output }
    }
}

#[async_trait]
impl Producer for FixedProducer {
    async fn produce(&self, _slot: usize) -> Result<Output, ProduceError> {
        Ok(self.output.clone())
    }
}

/// Produces a scripted result per executor slot, modeling divergent
/// validators. Slots beyond the script fail with a malformed payload.
#[derive(Debug, Clone)]
pub struct SlotProducer {
    slots: Vec<Result<Output, ProduceError>>,
}

impl SlotProducer {
    /// Script one result per slot index.
    pub fn new(slots: Vec<Result<Output, ProduceError>>) -> Self {
        Self { slots }
    }
}

#[async_trait]
impl Producer for SlotProducer {
    async fn produce(&self, slot: usize) -> Result<Output, ProduceError> {
        self.slots
            .get(slot)
            .cloned()
            .unwrap_or_else(|| Err(ProduceError::Malformed(format!("no script for slot {slot}"))))
    }
}

/// Fixed output plus an invocation counter.
#[derive(Debug)]
pub struct CountingProducer {
    output: Output,
    calls: Arc<AtomicUsize>,
}

impl CountingProducer {
    /// Producer that yields `output` and counts invocations.
    pub fn new(output: Output) -> Self {
        Self {
            output,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Producer for CountingProducer {
    async fn produce(&self, _slot: usize) -> Result<Output, ProduceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Sleeps before producing, for deadline tests.
#[derive(Debug, Clone)]
pub struct SlowProducer {
    delay: Duration,
    output: Output,
}

impl SlowProducer {
    /// Producer that yields `output` after `delay`.
    pub fn new(delay: Duration, output: Output) -> Self {
        Self { delay, output }
    }
}

#[async_trait]
impl Producer for SlowProducer {
    async fn produce(&self, _slot: usize) -> Result<Output, ProduceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.output.clone())
    }
}

/// Panics on a chosen slot; other slots yield the given output. For
/// exercising the adapter's abnormal-termination path.
#[derive(Debug, Clone)]
pub struct PanickingProducer {
    panic_slot: usize,
    output: Output,
}

impl PanickingProducer {
    /// Producer that panics on `panic_slot` and yields `output` elsewhere.
    pub fn new(panic_slot: usize, output: Output) -> Self {
        Self { panic_slot, output }
    }
}

#[async_trait]
impl Producer for PanickingProducer {
    async fn produce(&self, slot: usize) -> Result<Output, ProduceError> {
        assert!(slot != self.panic_slot, "scripted panic on slot {slot}");
        Ok(self.output.clone())
    }
}
