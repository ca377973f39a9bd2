//! Judge capability for semantically judged equivalence.

use async_trait::async_trait;

use crate::types::Output;

/// Failure of a judgment call. Folded into a Different verdict by the
/// comparator, never propagated.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum JudgeError {
    /// No judge is configured for this engine
    #[error("no judge configured")]
    Unavailable,

    /// The judgment call itself failed
    #[error("judgment call failed: {0}")]
    Inference(String),
}

/// A secondary nondeterministic judgment call deciding whether two
/// outputs count as the same result under free-text criteria.
///
/// Invoked once per leader/follower comparison; its verdict is trusted
/// directly and is not itself reconciled by a nested round.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Decide whether `a` and `b` are equivalent under `criteria`.
    async fn same(&self, a: &Output, b: &Output, criteria: &str) -> Result<bool, JudgeError>;
}

/// Judge for call sites that never use semantically judged comparison.
/// Any judged comparison under it counts as Different.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJudge;

#[async_trait]
impl Judge for NoJudge {
    async fn same(&self, _a: &Output, _b: &Output, _criteria: &str) -> Result<bool, JudgeError> {
        Err(JudgeError::Unavailable)
    }
}
