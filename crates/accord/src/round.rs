//! Round coordination.
//!
//! One round runs the producer once per executor slot, concurrently,
//! waits for every slot to terminate, then compares each follower
//! against the leader (slot 0). The outcome is unanimous: a single
//! differing follower forces Disagreed. There is no partial-quorum
//! path and no early exit on first disagreement; late-completing slots
//! are still recorded as candidates for diagnostics.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::comparator;
use crate::error::{AccordError, Result};
use crate::judge::Judge;
use crate::producer::{run_slot, Producer};
use crate::types::{
    CandidateResult, ComparatorSpec, FailureReason, Fingerprint, Output, RoundOutcome, RoundPhase,
    RoundStatus,
};

/// Run one full execute-and-compare round.
///
/// Errors only for invalid round parameters; producer and comparator
/// trouble is folded into the outcome.
pub(crate) async fn run_round<J: Judge>(
    fingerprint: &Fingerprint,
    producer: Arc<dyn Producer>,
    spec: &ComparatorSpec,
    judge: &J,
    executors: usize,
    slot_deadline: Duration,
) -> Result<RoundOutcome> {
    // Pending: validate before any slot starts
    if executors == 0 {
        return Err(AccordError::InvalidRound(
            "executor count must be at least 1".to_string(),
        ));
    }
    spec.validate()?;

    debug!(
        fingerprint = %fingerprint,
        executors,
        phase = ?RoundPhase::Executing,
        "starting round"
    );
    let candidates = execute_slots(producer, executors, slot_deadline).await;

    debug!(fingerprint = %fingerprint, phase = ?RoundPhase::Comparing, "all slots terminated");
    let outcome = compare_candidates(candidates, spec, judge).await;

    match outcome.status {
        RoundStatus::Agreed => {
            info!(fingerprint = %fingerprint, agreeing = outcome.agreeing.len(), "round agreed");
        }
        RoundStatus::Disagreed => {
            warn!(
                fingerprint = %fingerprint,
                agreeing = outcome.agreeing.len(),
                executors,
                "round disagreed"
            );
        }
        RoundStatus::Failed => {
            warn!(fingerprint = %fingerprint, "round failed: leader produced no output");
        }
    }

    Ok(outcome)
}

/// Executing: start all slots concurrently and wait for every one.
async fn execute_slots(
    producer: Arc<dyn Producer>,
    executors: usize,
    slot_deadline: Duration,
) -> Vec<CandidateResult> {
    let mut tasks = JoinSet::new();
    let mut task_slots = HashMap::new();

    for slot in 0..executors {
        let producer = Arc::clone(&producer);
        let handle = tasks.spawn(async move { run_slot(producer, slot, slot == 0, slot_deadline).await });
        task_slots.insert(handle.id(), slot);
    }

    let mut candidates: Vec<Option<CandidateResult>> = vec![None; executors];
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, candidate)) => {
                let slot = task_slots[&id];
                candidates[slot] = Some(candidate);
            }
            Err(err) => {
                // A panicking producer must still yield a comparable slot
                let slot = task_slots[&err.id()];
                warn!(slot, "producer task terminated abnormally");
                candidates[slot] = Some(CandidateResult {
                    executor: slot,
                    outcome: Err(FailureReason::Aborted),
                    leader: slot == 0,
                });
            }
        }
    }

    candidates.into_iter().flatten().collect()
}

/// Comparing: evaluate every follower against the leader and decide.
async fn compare_candidates<J: Judge>(
    candidates: Vec<CandidateResult>,
    spec: &ComparatorSpec,
    judge: &J,
) -> RoundOutcome {
    let leader_output = match &candidates[0].outcome {
        Ok(output) => output.clone(),
        Err(_) => {
            // Leader failure short-circuits: followers are not compared
            return RoundOutcome {
                status: RoundStatus::Failed,
                canonical: None,
                agreeing: BTreeSet::new(),
                candidates,
            };
        }
    };

    let mut agreeing = BTreeSet::from([0]);
    for follower in &candidates[1..] {
        if follower_equal(&leader_output, follower, spec, judge).await {
            agreeing.insert(follower.executor);
        }
    }

    let status = if agreeing.len() == candidates.len() {
        RoundStatus::Agreed
    } else {
        RoundStatus::Disagreed
    };

    RoundOutcome {
        status,
        canonical: (status == RoundStatus::Agreed).then_some(leader_output),
        agreeing,
        candidates,
    }
}

/// Compare one follower against the leader's output.
///
/// A failed follower normalizes to the empty sentinel under strict
/// comparison; under every other kind it is Different outright.
async fn follower_equal<J: Judge>(
    leader_output: &Output,
    follower: &CandidateResult,
    spec: &ComparatorSpec,
    judge: &J,
) -> bool {
    match (&follower.outcome, spec) {
        (Ok(output), _) => comparator::equal(leader_output, output, spec, judge).await,
        (Err(_), ComparatorSpec::Strict) => {
            comparator::strict_equal(leader_output, &Output::empty())
        }
        (Err(_), _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::NoJudge;
    use crate::producer::ProduceError;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(Output);

    #[async_trait]
    impl Producer for Fixed {
        async fn produce(&self, _slot: usize) -> std::result::Result<Output, ProduceError> {
            Ok(self.0.clone())
        }
    }

    struct Scripted(Vec<std::result::Result<Output, ProduceError>>);

    #[async_trait]
    impl Producer for Scripted {
        async fn produce(&self, slot: usize) -> std::result::Result<Output, ProduceError> {
            self.0.get(slot).cloned().unwrap_or_else(|| {
                Err(ProduceError::Malformed(format!("no script for slot {slot}")))
            })
        }
    }

    struct Counting {
        output: Output,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Producer for Counting {
        async fn produce(&self, _slot: usize) -> std::result::Result<Output, ProduceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    fn fp(id: &str) -> Fingerprint {
        Fingerprint::new(id).expect("fingerprint")
    }

    fn deadline() -> Duration {
        Duration::from_secs(5)
    }

    #[tokio::test]
    async fn unanimous_round_agrees_for_any_n() {
        for executors in [1usize, 2, 5] {
            let producer = Arc::new(Fixed(Output::Text("stable".to_string())));
            let outcome = run_round(
                &fp("wiki-claim"),
                producer,
                &ComparatorSpec::Strict,
                &NoJudge,
                executors,
                deadline(),
            )
            .await
            .expect("round");

            assert_eq!(outcome.status, RoundStatus::Agreed);
            assert_eq!(outcome.canonical, Some(Output::Text("stable".to_string())));
            assert_eq!(outcome.agreeing.len(), executors);
            assert_eq!(outcome.candidates.len(), executors);
        }
    }

    #[tokio::test]
    async fn single_divergent_follower_forces_disagreed() {
        let producer = Arc::new(Scripted(vec![
            Ok(Output::Text("a".to_string())),
            Ok(Output::Text("a".to_string())),
            Ok(Output::Text("b".to_string())),
        ]));
        let outcome = run_round(
            &fp("phish-check"),
            producer,
            &ComparatorSpec::Strict,
            &NoJudge,
            3,
            deadline(),
        )
        .await
        .expect("round");

        assert_eq!(outcome.status, RoundStatus::Disagreed);
        assert_eq!(outcome.canonical, None);
        assert_eq!(outcome.agreeing, BTreeSet::from([0, 1]));
    }

    #[tokio::test]
    async fn leader_failure_is_failed_not_disagreed() {
        let producer = Arc::new(Scripted(vec![
            Err(ProduceError::Network("dns".to_string())),
            Ok(Output::Number(1.0)),
            Ok(Output::Number(1.0)),
        ]));
        let outcome = run_round(
            &fp("rate-feed"),
            producer,
            &ComparatorSpec::Strict,
            &NoJudge,
            3,
            deadline(),
        )
        .await
        .expect("round");

        assert_eq!(outcome.status, RoundStatus::Failed);
        assert!(outcome.agreeing.is_empty());
        // Followers still recorded for diagnostics
        assert_eq!(outcome.candidates.len(), 3);
        assert_matches!(outcome.candidates[1].outcome, Ok(_));
    }

    #[tokio::test]
    async fn failed_followers_match_empty_leader_under_strict() {
        // Leader yields the empty sentinel; a failed follower normalizes
        // to the same sentinel and counts as Equal under strict only.
        let producer = Arc::new(Scripted(vec![
            Ok(Output::empty()),
            Err(ProduceError::Network("reset".to_string())),
        ]));
        let outcome = run_round(
            &fp("empty-claim"),
            producer,
            &ComparatorSpec::Strict,
            &NoJudge,
            2,
            deadline(),
        )
        .await
        .expect("round");
        assert_eq!(outcome.status, RoundStatus::Agreed);
    }

    #[tokio::test]
    async fn failed_follower_is_different_under_tolerance() {
        let producer = Arc::new(Scripted(vec![
            Ok(Output::Number(0.0)),
            Err(ProduceError::Network("reset".to_string())),
        ]));
        let outcome = run_round(
            &fp("zero-feed"),
            producer,
            &ComparatorSpec::NumericTolerance { tolerance: 0.99 },
            &NoJudge,
            2,
            deadline(),
        )
        .await
        .expect("round");
        assert_eq!(outcome.status, RoundStatus::Disagreed);
    }

    #[tokio::test]
    async fn tolerance_scenario_three_executors() {
        // leader=82, follower1=83 (~1.2%, equal), follower2=88 (~6.8%, different)
        let producer = Arc::new(Scripted(vec![
            Ok(Output::Number(82.0)),
            Ok(Output::Number(83.0)),
            Ok(Output::Number(88.0)),
        ]));
        let outcome = run_round(
            &fp("sentiment-score"),
            producer,
            &ComparatorSpec::NumericTolerance { tolerance: 0.05 },
            &NoJudge,
            3,
            deadline(),
        )
        .await
        .expect("round");

        assert_eq!(outcome.status, RoundStatus::Disagreed);
        assert_eq!(outcome.agreeing, BTreeSet::from([0, 1]));
    }

    #[tokio::test]
    async fn every_slot_invoked_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let producer = Arc::new(Counting {
            output: Output::Bool(true),
            calls: Arc::clone(&calls),
        });
        run_round(
            &fp("dkim-alignment"),
            producer,
            &ComparatorSpec::Strict,
            &NoJudge,
            4,
            deadline(),
        )
        .await
        .expect("round");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_executors_rejected() {
        let producer = Arc::new(Fixed(Output::empty()));
        let err = run_round(
            &fp("x"),
            producer,
            &ComparatorSpec::Strict,
            &NoJudge,
            0,
            deadline(),
        )
        .await
        .expect_err("must reject");
        assert_matches!(err, AccordError::InvalidRound(_));
    }
}
