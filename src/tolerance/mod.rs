//! Tolerance engine: per-kind comparators answering "are these two values
//! equal within tolerance?"
//!
//! Three comparators cover the kinds the engine understands:
//!
//! - **Numeric** ([`NumericComparator`]): percentage or absolute deviation,
//!   with optional decimal rounding first
//! - **Temporal** ([`TemporalComparator`]): absolute difference within a
//!   duration window
//! - **Text** ([`TextComparator`]): equality after composable normalization
//!
//! [`ToleranceEngine`] dispatches a value pair to the right comparator.
//! Null handling and cross-kind pairings are resolved before dispatch: two
//! nulls are equal, a single null is a mismatch, and an unsupported pairing
//! (numeric vs text, say) is reported as a mismatch, never coerced.

mod numeric;
mod temporal;
mod text;

pub use numeric::NumericComparator;
pub use temporal::TemporalComparator;
pub use text::TextComparator;

use crate::config::ValidationConfig;
use crate::core::Value;

/// The answer for one value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the pair is equal within tolerance.
    pub equal: bool,
    /// Optional detail explaining a mismatch.
    pub detail: Option<String>,
}

impl Evaluation {
    /// An equal-within-tolerance answer.
    pub fn equal() -> Self {
        Self {
            equal: true,
            detail: None,
        }
    }

    /// A mismatch with detail.
    pub fn mismatch(detail: impl Into<String>) -> Self {
        Self {
            equal: false,
            detail: Some(detail.into()),
        }
    }
}

/// Dispatches value pairs to the comparator for their kind.
#[derive(Debug, Clone)]
pub struct ToleranceEngine {
    numeric: NumericComparator,
    temporal: TemporalComparator,
    text: TextComparator,
}

impl ToleranceEngine {
    /// Builds the engine from a test case's configuration.
    ///
    /// Numeric column values use `float_tolerance` when declared, falling
    /// back to the row-count tolerance.
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            numeric: NumericComparator::new(
                config.numeric_value_tolerance(),
                config.decimal_precision,
            ),
            temporal: TemporalComparator::new(config.date_tolerance),
            text: TextComparator::new(config.string_options),
        }
    }

    /// Evaluates one source/target value pair.
    pub fn evaluate(&self, source: &Value, target: &Value) -> Evaluation {
        match (source, target) {
            (Value::Null, Value::Null) => Evaluation::equal(),
            (Value::Null, _) | (_, Value::Null) => {
                Evaluation::mismatch("null on one side only")
            }
            (Value::Bool(s), Value::Bool(t)) => {
                if s == t {
                    Evaluation::equal()
                } else {
                    Evaluation::mismatch(format!("boolean mismatch: {s} vs {t}"))
                }
            }
            (Value::Timestamp(s), Value::Timestamp(t)) => self.temporal.evaluate(*s, *t),
            (Value::Text(s), Value::Text(t)) => self.text.evaluate(s, t),
            (s, t) => match (s.as_f64(), t.as_f64()) {
                (Some(sv), Some(tv)) => self.numeric.evaluate(sv, tv),
                _ => Evaluation::mismatch(format!(
                    "unsupported type pairing: {} vs {}",
                    s.kind(),
                    t.kind()
                )),
            },
        }
    }

    /// The numeric comparator, also used for the row-count check when built
    /// with the row-count tolerance.
    pub fn numeric(&self) -> &NumericComparator {
        &self.numeric
    }
}
