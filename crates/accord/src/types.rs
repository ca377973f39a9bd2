//! Core reconciliation types
//!
//! This module contains the fundamental types used throughout the engine:
//! request identity, producer outputs, per-slot candidates, equivalence
//! specifications, and round outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::AccordError;
use crate::producer::ProduceError;

/// Stable identity for a logical request.
///
/// The fingerprint keys the result store: two requests with the same
/// fingerprint are the same logical entity, and a later commit overwrites
/// the earlier one unconditionally. Must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Create a fingerprint, rejecting empty identities.
    pub fn new(id: impl Into<String>) -> Result<Self, AccordError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AccordError::InvalidRound(
                "fingerprint must be non-empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A producer's typed output.
///
/// Structured payloads use [`serde_json::Value`], whose map type keeps keys
/// sorted, so two JSON outputs that differ only in whitespace or key order
/// compare equal once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Output {
    /// Free text (LLM completion, scraped page extract)
    Text(String),
    /// A numeric result (price, rate, score)
    Number(f64),
    /// A boolean verdict (safety check, alignment check)
    Bool(bool),
    /// A structured JSON payload
    Json(serde_json::Value),
}

impl Output {
    /// The well-known empty sentinel a failed slot normalizes to under
    /// strict comparison.
    pub fn empty() -> Self {
        Output::Text(String::new())
    }

    /// Interpret the output as a finite number, if it holds one.
    ///
    /// Text is trimmed and parsed; JSON numbers are unwrapped. Booleans
    /// and non-numeric payloads yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Output::Number(n) => *n,
            Output::Text(s) => s.trim().parse::<f64>().ok()?,
            Output::Json(v) => v.as_f64()?,
            Output::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Text(s) => write!(f, "{s}"),
            Output::Number(n) => write!(f, "{n}"),
            Output::Bool(b) => write!(f, "{b}"),
            Output::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Why an executor slot yielded no usable output.
///
/// Preserved on the candidate for observability; never surfaced as an
/// error to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The slot's deadline elapsed before the producer returned
    #[error("producer exceeded slot deadline")]
    Timeout,
    /// The producer reported a recoverable failure
    #[error(transparent)]
    Producer(#[from] ProduceError),
    /// The producer task panicked or was aborted
    #[error("producer task terminated abnormally")]
    Aborted,
}

/// One executor's result for a round.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    /// Executor slot index (0 is the leader)
    pub executor: usize,
    /// Output, or the reason the slot produced none
    pub outcome: Result<Output, FailureReason>,
    /// Whether this slot was the designated leader
    pub leader: bool,
}

impl CandidateResult {
    /// The output this candidate contributes to strict comparison:
    /// its value, or the empty sentinel on failure.
    pub fn output_or_sentinel(&self) -> Output {
        self.outcome.clone().unwrap_or_else(|_| Output::empty())
    }
}

/// Equivalence rule applied between the leader and each follower.
///
/// A closed set of kinds; call sites select one per round rather than
/// supplying free-text dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparatorSpec {
    /// Value-for-value equality after canonical normalization.
    /// Required where security demands exact agreement.
    Strict,
    /// Numeric equality within a relative tolerance fraction.
    NumericTolerance {
        /// Maximum allowed relative difference `|a-b| / max(|a|,|b|)`
        tolerance: f64,
    },
    /// Equivalence delegated to a single judgment call parameterized by
    /// free-text criteria.
    ///
    /// The judge's verdict is trusted directly; it is not itself
    /// reconciled by a nested round. A judge failure counts as
    /// Different.
    SemanticJudged {
        /// Comparison instructions handed to the judge
        criteria: String,
    },
}

impl ComparatorSpec {
    /// Build a numeric-tolerance spec, rejecting non-finite or negative
    /// fractions.
    pub fn numeric_tolerance(tolerance: f64) -> Result<Self, AccordError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(AccordError::InvalidRound(format!(
                "tolerance must be a finite non-negative fraction, got {tolerance}"
            )));
        }
        Ok(ComparatorSpec::NumericTolerance { tolerance })
    }

    /// Validate the spec before a round starts.
    pub(crate) fn validate(&self) -> Result<(), AccordError> {
        match self {
            ComparatorSpec::NumericTolerance { tolerance }
                if !tolerance.is_finite() || *tolerance < 0.0 =>
            {
                Err(AccordError::InvalidRound(format!(
                    "tolerance must be a finite non-negative fraction, got {tolerance}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Inputs validated, slots not yet started
    Pending,
    /// Producer slots running concurrently
    Executing,
    /// All slots terminated; followers being compared against the leader
    Comparing,
    /// Terminal: unanimous agreement reached
    Agreed,
    /// Terminal: leader succeeded but at least one follower differed
    Disagreed,
    /// Terminal: the leader itself failed
    Failed,
}

impl RoundPhase {
    /// Whether the round can make no further progress.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RoundPhase::Agreed | RoundPhase::Disagreed | RoundPhase::Failed
        )
    }
}

/// Terminal status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Every follower agreed with the leader
    Agreed,
    /// The leader succeeded but at least one follower differed
    Disagreed,
    /// The leader failed; followers were not compared
    Failed,
}

/// Outcome of one full round.
///
/// Round-scoped and never persisted; only the canonical value of an
/// `Agreed` outcome reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Terminal status
    pub status: RoundStatus,
    /// Leader's output, adopted as canonical on agreement
    pub canonical: Option<Output>,
    /// Slots that compared Equal to the leader (the leader included).
    /// BTreeSet for deterministic iteration in logs and tests.
    pub agreeing: BTreeSet<usize>,
    /// Every slot's result, retained for diagnostics
    pub candidates: Vec<CandidateResult>,
}

impl RoundOutcome {
    /// Whether the round reached unanimous agreement.
    pub fn agreed(&self) -> bool {
        self.status == RoundStatus::Agreed
    }
}

/// What `evaluate` hands back: whether a commit happened, plus the full
/// round outcome. Disagreement and producer failure are representable
/// values here, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
    /// True iff the canonical value was written to the store
    pub committed: bool,
    /// The round's outcome, including per-slot diagnostics
    pub outcome: RoundOutcome,
}

/// A committed canonical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Request identity this value was committed under
    pub fingerprint: Fingerprint,
    /// Canonical value of the agreed round
    pub value: Output,
    /// Monotone per-engine commit sequence number
    pub committed_at: u64,
}
