//! Numeric equivalence within a relative tolerance.
//!
//! Zero handling is asymmetric on purpose: two exact zeros agree, zero
//! against nonzero is a meaningful divergence rather than a division
//! error. Operands that do not hold a finite number are Different.

use crate::types::Output;

/// Numeric equality within a relative tolerance fraction.
pub(crate) fn numeric_equal(a: &Output, b: &Output, tolerance: f64) -> bool {
    let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
        return false;
    };

    if x == 0.0 && y == 0.0 {
        return true;
    }
    if x == 0.0 || y == 0.0 {
        return false;
    }

    let relative = (x - y).abs() / x.abs().max(y.abs());
    relative <= tolerance
}
