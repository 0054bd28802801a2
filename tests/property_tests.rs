//! Property-based tests for the tolerance comparators and the parameter
//! mini-language.
//!
//! These verify invariants that must hold for all inputs: reflexivity and
//! symmetry of the comparators, composability of text normalization, and
//! order preservation in config parsing.

use chrono::{Duration, NaiveDate};
use parity_guard::config::{
    NumericTolerance, StringOptions, ToleranceMode, ValidationConfig,
};
use parity_guard::core::Severity;
use parity_guard::tolerance::{NumericComparator, TemporalComparator, TextComparator};
use proptest::prelude::*;

fn tolerance(value: f64, mode: ToleranceMode) -> NumericTolerance {
    NumericTolerance {
        value,
        mode,
        severity: Severity::Hard,
    }
}

proptest! {
    /// Every finite value equals itself under any tolerance.
    #[test]
    fn numeric_comparison_is_reflexive(
        value in -1e9f64..1e9,
        tol in 0.0f64..100.0
    ) {
        let pct = NumericComparator::new(tolerance(tol, ToleranceMode::Percentage), None);
        prop_assert!(pct.evaluate(value, value).equal);

        let abs = NumericComparator::new(tolerance(tol, ToleranceMode::Absolute), None);
        prop_assert!(abs.evaluate(value, value).equal);
    }

    /// Absolute tolerance depends only on the difference, so the verdict
    /// is symmetric in its arguments.
    #[test]
    fn absolute_tolerance_is_symmetric(
        source in -1e6f64..1e6,
        target in -1e6f64..1e6,
        tol in 0.0f64..1e3
    ) {
        let comparator =
            NumericComparator::new(tolerance(tol, ToleranceMode::Absolute), None);
        prop_assert_eq!(
            comparator.evaluate(source, target).equal,
            comparator.evaluate(target, source).equal
        );
    }

    /// A deviation strictly inside the percentage bound is accepted, and
    /// one strictly outside is rejected.
    #[test]
    fn percentage_bound_separates_inside_from_outside(
        source in 1.0f64..1e6,
        percent in 0.5f64..50.0,
        inside in 0.0f64..0.98,
        outside in 1.02f64..3.0
    ) {
        let comparator =
            NumericComparator::new(tolerance(percent, ToleranceMode::Percentage), None);

        let near = source * (1.0 + inside * percent / 100.0);
        prop_assert!(comparator.evaluate(source, near).equal);

        let far = source * (1.0 + outside * percent / 100.0);
        prop_assert!(!comparator.evaluate(source, far).equal);
    }

    /// Zero tolerance accepts only exact equality.
    #[test]
    fn zero_tolerance_requires_exact_match(
        source in 1.0f64..1e6,
        delta in 0.001f64..1e3
    ) {
        let comparator =
            NumericComparator::new(tolerance(0.0, ToleranceMode::Percentage), None);
        prop_assert!(comparator.evaluate(source, source).equal);
        prop_assert!(!comparator.evaluate(source, source + delta).equal);
    }

    /// A timestamp drifted by less than the window is accepted; drifted by
    /// more than the window it is rejected. Symmetric in direction.
    #[test]
    fn temporal_window_is_symmetric(
        base_minutes in 0i64..1_000_000,
        window_minutes in 1i64..10_000,
        drift_inside in 0i64..10_000
    ) {
        let drift = drift_inside % window_minutes;
        let base = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(base_minutes);
        let comparator =
            TemporalComparator::new(Some(Duration::minutes(window_minutes)));

        let within = base + Duration::minutes(drift);
        prop_assert!(comparator.evaluate(base, within).equal);
        prop_assert!(comparator.evaluate(within, base).equal);

        let beyond = base + Duration::minutes(window_minutes + 1);
        prop_assert!(!comparator.evaluate(base, beyond).equal);
        prop_assert!(!comparator.evaluate(beyond, base).equal);
    }

    /// With both normalizations enabled, case changes and added padding
    /// never break equality.
    #[test]
    fn text_normalization_absorbs_case_and_padding(
        word in "[a-zA-Z][a-zA-Z0-9_]{0,20}",
        left_pad in " {0,5}",
        right_pad in " {0,5}"
    ) {
        let comparator = TextComparator::new(StringOptions {
            case_insensitive: true,
            trim_whitespace: true,
        });
        let mangled = format!("{left_pad}{}{right_pad}", word.to_uppercase());
        prop_assert!(comparator.evaluate(&word, &mangled).equal);
    }

    /// Strict text comparison is plain equality.
    #[test]
    fn strict_text_comparison_is_equality(
        a in "[a-z]{1,10}",
        b in "[a-z]{1,10}"
    ) {
        let comparator = TextComparator::new(StringOptions::default());
        prop_assert_eq!(comparator.evaluate(&a, &b).equal, a == b);
    }

    /// Parsed mappings survive a round trip through the mini-language in
    /// declaration order.
    #[test]
    fn column_mappings_round_trip(
        names in prop::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}"), 1..6)
    ) {
        let declared = names
            .iter()
            .map(|(s, t)| format!("{s}={t}"))
            .collect::<Vec<_>>()
            .join(",");
        let config =
            ValidationConfig::parse(&format!("column_mappings={declared}")).unwrap();
        prop_assert_eq!(config.column_mappings.len(), names.len());
        prop_assert_eq!(config.mappings_string(), declared);
    }

    /// Any non-negative tolerance with a valid mode parses, and the value
    /// comes through unchanged.
    #[test]
    fn tolerance_values_parse_exactly(tol in 0.0f64..1e6) {
        let config =
            ValidationConfig::parse(&format!("tolerance={tol},tolerance_type=absolute"))
                .unwrap();
        prop_assert_eq!(config.tolerance.value, tol);
        prop_assert_eq!(config.tolerance.mode, ToleranceMode::Absolute);
    }
}
