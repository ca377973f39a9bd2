//! Scriptable judges.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use accord::{Judge, JudgeError, Output};

/// Returns a fixed verdict and counts judgment calls.
#[derive(Debug)]
pub struct ScriptedJudge {
    verdict: bool,
    calls: Arc<AtomicUsize>,
}

impl ScriptedJudge {
    /// Judge that always answers `verdict`.
    pub fn new(verdict: bool) -> Self {
        Self {
            verdict,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared judgment-call counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn same(&self, _a: &Output, _b: &Output, _criteria: &str) -> Result<bool, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.verdict)
    }
}

/// Deterministic stand-in for a semantic judge: case- and
/// whitespace-insensitive text comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextJudge;

#[async_trait]
impl Judge for TextJudge {
    async fn same(&self, a: &Output, b: &Output, _criteria: &str) -> Result<bool, JudgeError> {
        Ok(a.to_string().trim().to_lowercase() == b.to_string().trim().to_lowercase())
    }
}

/// Every judgment call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingJudge;

#[async_trait]
impl Judge for FailingJudge {
    async fn same(&self, _a: &Output, _b: &Output, _criteria: &str) -> Result<bool, JudgeError> {
        Err(JudgeError::Inference("judge offline".to_string()))
    }
}
