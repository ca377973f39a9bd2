#![deny(clippy::dbg_macro)]
#![deny(clippy::todo)]
//! # Accord - unanimous reconciliation of nondeterministic results
//!
//! Every caller of this engine follows one pattern: invoke an external,
//! nondeterministic producer (a web fetch, an inference call, or both),
//! then reconcile the results of several independent executions into one
//! agreed value before committing it to shared state.
//!
//! ## Architecture
//!
//! - **types**: fingerprints, outputs, candidates, specs, outcomes
//! - **producer**: producer capability plus the slot adapter that folds
//!   every failure into a comparable candidate
//! - **comparator**: strict / numeric-tolerance / semantically-judged
//!   equivalence rules
//! - **round**: concurrent fan-out and unanimity decision
//! - **gate** / **store**: commit-on-agreement over a keyed result store
//! - **engine**: the `evaluate` / `read` facade
//!
//! ## Protocol design
//!
//! - **Single round**: all executor slots run concurrently to completion
//!   or deadline; comparison starts only after every slot terminates
//! - **Leader baseline**: slot 0 is the fixed leader; every follower is
//!   compared against it under the round's equivalence rule
//! - **Unanimity**: a single differing follower forces Disagreed; there
//!   is no majority or partial-quorum acceptance
//! - **Liveness over fail-fast**: disagreement and producer failure are
//!   values, not errors; only an unavailable store propagates

pub mod comparator;
pub mod config;
pub mod engine;
pub mod error;
pub mod judge;
pub mod producer;
pub mod store;
pub mod types;

mod gate;
mod round;

// Prelude
pub mod prelude;

// Re-export core types
pub use config::RoundConfig;
pub use engine::Engine;
pub use error::{AccordError, Result, StoreError};
pub use judge::{Judge, JudgeError, NoJudge};
pub use producer::{ProduceError, Producer};
pub use store::{MemoryStore, ResultStore};
pub use types::{
    CandidateResult, CommitResult, ComparatorSpec, FailureReason, Fingerprint, Output,
    RoundOutcome, RoundPhase, RoundStatus, StoredRecord,
};
