//! Date/time tolerance comparison.

use super::Evaluation;
use chrono::{Duration, NaiveDateTime};

/// Compares timestamps under an optional duration window.
///
/// A missing window means exact equality is required.
#[derive(Debug, Clone, Copy)]
pub struct TemporalComparator {
    window: Option<Duration>,
}

impl TemporalComparator {
    /// Creates a comparator for the given window.
    pub fn new(window: Option<Duration>) -> Self {
        Self { window }
    }

    /// Evaluates a source/target pair: equal iff `|s − t|` is within the
    /// window.
    pub fn evaluate(&self, source: NaiveDateTime, target: NaiveDateTime) -> Evaluation {
        let diff = source.signed_duration_since(target).abs();
        let within = match self.window {
            Some(window) => diff <= window,
            None => diff.is_zero(),
        };

        if within {
            Evaluation::equal()
        } else {
            Evaluation::mismatch(format!(
                "timestamps differ by {diff} ({source} vs {target})"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_within_one_day_window() {
        let cmp = TemporalComparator::new(Some(Duration::days(1)));
        // 23 hours apart
        assert!(cmp
            .evaluate(ts("2025-01-01T10:00:00"), ts("2025-01-02T09:00:00"))
            .equal);
    }

    #[test]
    fn test_outside_one_day_window() {
        let cmp = TemporalComparator::new(Some(Duration::days(1)));
        // 25.5 hours apart
        let eval = cmp.evaluate(ts("2025-01-01T10:00:00"), ts("2025-01-02T11:30:00"));
        assert!(!eval.equal);
        assert!(eval.detail.is_some());
    }

    #[test]
    fn test_window_is_symmetric() {
        let cmp = TemporalComparator::new(Some(Duration::hours(1)));
        assert!(cmp
            .evaluate(ts("2025-06-01T12:30:00"), ts("2025-06-01T12:00:00"))
            .equal);
        assert!(cmp
            .evaluate(ts("2025-06-01T12:00:00"), ts("2025-06-01T12:30:00"))
            .equal);
    }

    #[test]
    fn test_missing_window_means_exact() {
        let cmp = TemporalComparator::new(None);
        assert!(cmp
            .evaluate(ts("2025-01-01T00:00:00"), ts("2025-01-01T00:00:00"))
            .equal);
        assert!(!cmp
            .evaluate(ts("2025-01-01T00:00:00"), ts("2025-01-01T00:00:01"))
            .equal);
    }

    #[test]
    fn test_exact_boundary_is_within() {
        let cmp = TemporalComparator::new(Some(Duration::hours(24)));
        assert!(cmp
            .evaluate(ts("2025-01-01T10:00:00"), ts("2025-01-02T10:00:00"))
            .equal);
    }
}
