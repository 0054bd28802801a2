//! Numeric tolerance comparison.

use super::Evaluation;
use crate::config::{DecimalPrecision, NumericTolerance, ToleranceMode};

/// Absolute fallback threshold when the source value is zero in percentage
/// mode, so a relative test never divides by zero.
const ZERO_SOURCE_EPSILON: f64 = 1e-9;

/// Compares numbers under a percentage or absolute tolerance, with optional
/// decimal rounding applied to both sides first.
#[derive(Debug, Clone, Copy)]
pub struct NumericComparator {
    tolerance: NumericTolerance,
    precision: Option<DecimalPrecision>,
}

impl NumericComparator {
    /// Creates a comparator for the given tolerance and rounding.
    pub fn new(tolerance: NumericTolerance, precision: Option<DecimalPrecision>) -> Self {
        Self {
            tolerance,
            precision,
        }
    }

    /// Evaluates a source/target pair.
    ///
    /// Percentage mode tests `|s − t| <= (value/100)·|s|`, falling back to
    /// an absolute `|s − t| <= 1e-9` test when the source is zero. The
    /// percentage test is therefore relative to the source and only
    /// symmetric under swapping sides when both values are nonzero.
    pub fn evaluate(&self, source: f64, target: f64) -> Evaluation {
        let (source, target) = match self.precision {
            Some(DecimalPrecision::Places(places)) => {
                (round_to(source, places), round_to(target, places))
            }
            Some(DecimalPrecision::Exact) | None => (source, target),
        };

        let diff = (source - target).abs();
        let (within, allowed) = match self.tolerance.mode {
            ToleranceMode::Percentage => {
                if source == 0.0 {
                    (diff <= ZERO_SOURCE_EPSILON, ZERO_SOURCE_EPSILON)
                } else {
                    let allowed = self.tolerance.value / 100.0 * source.abs();
                    (diff <= allowed, allowed)
                }
            }
            ToleranceMode::Absolute => (diff <= self.tolerance.value, self.tolerance.value),
        };

        if within {
            Evaluation::equal()
        } else {
            Evaluation::mismatch(format!(
                "difference {diff} exceeds allowed {allowed} ({source} vs {target})"
            ))
        }
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
