//! Producer capability and slot adapter.
//!
//! A [`Producer`] wraps an externally supplied nondeterministic operation
//! (web fetch, LLM inference). The adapter invokes it once per executor
//! slot under a bounded deadline and converts every error, timeout, or
//! abnormal termination into a [`FailureReason`] value. Nothing crosses
//! this boundary as an `Err` to the coordinator: every slot yields a
//! comparable [`CandidateResult`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::types::{CandidateResult, FailureReason, Output};

/// Recoverable failure reported by a producer.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ProduceError {
    /// Network request failed or returned an unusable response
    #[error("network request failed: {0}")]
    Network(String),

    /// Inference call failed or was refused
    #[error("inference call failed: {0}")]
    Inference(String),

    /// The producer got a response it could not parse
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// An externally supplied nondeterministic operation.
///
/// Stateless from the engine's perspective; internal nondeterminism
/// (network timing, model sampling) is the reason independent slots can
/// diverge. `slot` is the executor index, handed through for diagnostics
/// only; implementations should not vary semantics on it.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Perform the operation once and return its output.
    async fn produce(&self, slot: usize) -> Result<Output, ProduceError>;
}

#[async_trait]
impl<P: Producer + ?Sized> Producer for Arc<P> {
    async fn produce(&self, slot: usize) -> Result<Output, ProduceError> {
        (**self).produce(slot).await
    }
}

/// Run one executor slot to completion or deadline.
///
/// No retry on failure: a failed slot simply becomes a candidate that
/// will disagree with any successful leader.
pub(crate) async fn run_slot<P: Producer>(
    producer: P,
    slot: usize,
    leader: bool,
    deadline: Duration,
) -> CandidateResult {
    let outcome = match tokio::time::timeout(deadline, producer.produce(slot)).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => {
            debug!(slot, error = %err, "producer slot failed");
            Err(FailureReason::Producer(err))
        }
        Err(_) => {
            debug!(slot, deadline_ms = deadline.as_millis() as u64, "producer slot timed out");
            Err(FailureReason::Timeout)
        }
    };

    CandidateResult {
        executor: slot,
        outcome,
        leader,
    }
}
