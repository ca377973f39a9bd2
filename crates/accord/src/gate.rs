//! Commit gate.
//!
//! The only writer to the result store. An Agreed outcome upserts the
//! canonical value; any other outcome leaves stored state untouched and
//! still reports success, so a failed reconciliation never aborts the
//! surrounding transaction. Storage failure is the one condition that
//! propagates.

use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::ResultStore;
use crate::types::{CommitResult, Fingerprint, RoundOutcome, RoundStatus, StoredRecord};

/// Commit an outcome: upsert on Agreed, no-op success otherwise.
pub(crate) async fn commit<S: ResultStore>(
    store: &S,
    fingerprint: &Fingerprint,
    outcome: RoundOutcome,
    committed_at: u64,
) -> Result<CommitResult, StoreError> {
    if outcome.status == RoundStatus::Agreed {
        if let Some(value) = outcome.canonical.clone() {
            store
                .put(StoredRecord {
                    fingerprint: fingerprint.clone(),
                    value,
                    committed_at,
                })
                .await?;
            info!(fingerprint = %fingerprint, committed_at, "canonical value committed");
            return Ok(CommitResult {
                committed: true,
                outcome,
            });
        }
    }

    debug!(fingerprint = %fingerprint, status = ?outcome.status, "no commit this round");
    Ok(CommitResult {
        committed: false,
        outcome,
    })
}
