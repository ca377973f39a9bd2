//! Accord testing fixtures
//!
//! Deterministic producers, judges, and stores shared by unit and
//! integration tests, so round behavior can be scripted per executor
//! slot without real network or inference calls.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! accord-testkit = { path = "../accord-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod judges;
pub mod producers;
pub mod stores;

// Re-export commonly used items
pub use judges::{FailingJudge, ScriptedJudge, TextJudge};
pub use producers::{CountingProducer, FixedProducer, PanickingProducer, SlotProducer, SlowProducer};
pub use stores::UnavailableStore;
