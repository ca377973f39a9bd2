//! Semantically judged equivalence.

use tracing::debug;

use crate::judge::Judge;
use crate::types::Output;

/// Delegate the verdict to a single judgment call. A failed call counts
/// as Different.
pub(crate) async fn judged_equal<J: Judge>(
    a: &Output,
    b: &Output,
    criteria: &str,
    judge: &J,
) -> bool {
    match judge.same(a, b, criteria).await {
        Ok(verdict) => verdict,
        Err(err) => {
            debug!(error = %err, "judgment call failed, treating as different");
            false
        }
    }
}
