//! Prelude for convenient imports.

pub use crate::config::RoundConfig;
pub use crate::engine::Engine;
pub use crate::error::{AccordError, Result, StoreError};
pub use crate::judge::{Judge, JudgeError, NoJudge};
pub use crate::producer::{ProduceError, Producer};
pub use crate::store::{MemoryStore, ResultStore};
pub use crate::types::{
    CommitResult, ComparatorSpec, FailureReason, Fingerprint, Output, RoundOutcome, RoundStatus,
    StoredRecord,
};
