//! Strict equivalence: value-for-value equality.
//!
//! JSON payloads were parsed into [`serde_json::Value`] at production
//! time, so whitespace and key order are already normalized away; the
//! remaining comparison is plain value equality. Outputs of different
//! kinds never compare equal.

use crate::types::Output;

/// Value-for-value equality.
pub(crate) fn strict_equal(a: &Output, b: &Output) -> bool {
    match (a, b) {
        (Output::Text(x), Output::Text(y)) => x == y,
        (Output::Bool(x), Output::Bool(y)) => x == y,
        (Output::Json(x), Output::Json(y)) => x == y,
        // Exact numeric equality; NaN never equals itself
        (Output::Number(x), Output::Number(y)) => x == y,
        _ => false,
    }
}
