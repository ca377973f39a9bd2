//! Pluggable equivalence rules.
//!
//! Three kinds, selected by [`ComparatorSpec`]: strict value equality,
//! numeric equality within a relative tolerance, and equivalence
//! delegated to a judgment call. Malformed operands are Different under
//! every kind; comparison never fails.

mod numeric;
mod semantic;
mod strict;

pub(crate) use numeric::numeric_equal;
pub(crate) use strict::strict_equal;

use crate::judge::Judge;
use crate::types::{ComparatorSpec, Output};

/// Decide whether two outputs count as the same result under `spec`.
pub async fn equal<J: Judge>(a: &Output, b: &Output, spec: &ComparatorSpec, judge: &J) -> bool {
    match spec {
        ComparatorSpec::Strict => strict_equal(a, b),
        ComparatorSpec::NumericTolerance { tolerance } => numeric_equal(a, b, *tolerance),
        ComparatorSpec::SemanticJudged { criteria } => {
            semantic::judged_equal(a, b, criteria, judge).await
        }
    }
}
