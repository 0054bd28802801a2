//! Typed configuration model for one validation test case.
//!
//! A test case declares its parameters in a flat mini-language of
//! `key=value` segments separated by commas or semicolons, with pipe- or
//! comma-delimited sub-lists per key:
//!
//! ```text
//! source_table=products;target_table=new_products;tolerance=5;
//! tolerance_type=percentage;validation_type=soft;
//! column_mappings=cost_price=price,description=product_description;
//! exclude_columns=created_date,updated_date;key_column=id
//! ```
//!
//! [`ValidationConfig::parse`] turns that string into a strict typed model,
//! built once per test case and read-only thereafter. Malformed or
//! contradictory parameters abort with [`GuardError::Config`] before any
//! comparison runs; unknown keys are collected as warnings, never silently
//! accepted.

use crate::core::Severity;
use crate::error::{GuardError, Result};
use chrono::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of rows sampled per column-value check.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// How a numeric tolerance value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceMode {
    /// `value` is a whole percent of the source magnitude (20 means 20%).
    Percentage,
    /// `value` is an absolute allowed difference.
    Absolute,
}

/// A numeric tolerance rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericTolerance {
    /// The allowed deviation; always non-negative.
    pub value: f64,
    /// Percentage-of-source or absolute.
    pub mode: ToleranceMode,
    /// Severity a violation of this tolerance carries.
    pub severity: Severity,
}

impl NumericTolerance {
    /// An exact-match tolerance (zero allowed deviation) with the given
    /// severity.
    pub fn exact(severity: Severity) -> Self {
        Self {
            value: 0.0,
            mode: ToleranceMode::Percentage,
            severity,
        }
    }
}

/// String normalization options, independently toggleable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringOptions {
    /// Lower-case both sides before comparing.
    pub case_insensitive: bool,
    /// Strip leading/trailing whitespace before comparing.
    pub trim_whitespace: bool,
}

/// Decimal rounding applied to both numeric values before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalPrecision {
    /// No rounding.
    Exact,
    /// Round both sides to this many decimal places.
    Places(u32),
}

/// An explicit, user-declared column correspondence.
///
/// Explicit mappings always take precedence over heuristic matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Column name on the source side.
    pub source_column: String,
    /// Column name on the target side.
    pub target_column: String,
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.source_column, self.target_column)
    }
}

/// Per-kind match-rate thresholds for column verdicts.
///
/// These are explicit configuration values threaded through the outcome
/// aggregator; there are no module-level mutable defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    /// Threshold for numeric columns.
    pub numeric: f64,
    /// Threshold for text columns.
    pub string: f64,
    /// Threshold for every other kind.
    pub other: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            numeric: 0.90,
            string: 0.95,
            other: 1.0,
        }
    }
}

impl MatchThresholds {
    /// The threshold governing a column of the given kind.
    pub fn for_kind(&self, kind: crate::core::DataKind) -> f64 {
        use crate::core::DataKind;
        match kind {
            DataKind::Numeric => self.numeric,
            DataKind::Text => self.string,
            _ => self.other,
        }
    }
}

/// The typed parameters of one validation test case.
///
/// Constructed once via [`ValidationConfig::parse`] (or assembled directly
/// for programmatic use) and read-only for the duration of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Table to read on the source side.
    pub source_table: String,
    /// Table to read on the target side.
    pub target_table: String,
    /// Opaque row filter handed to the sampling collaborator, source side.
    pub source_where: Option<String>,
    /// Opaque row filter handed to the sampling collaborator, target side.
    pub target_where: Option<String>,
    /// Tolerance for the row-count check and numeric columns.
    pub tolerance: NumericTolerance,
    /// Default severity for tolerance/threshold violations.
    pub validation_type: Severity,
    /// Allowed window for date/time comparisons; absent means exact.
    pub date_tolerance: Option<Duration>,
    /// Numeric-only override tolerance for column values.
    pub float_tolerance: Option<NumericTolerance>,
    /// String normalization options.
    pub string_options: StringOptions,
    /// Rounding applied before numeric comparison.
    pub decimal_precision: Option<DecimalPrecision>,
    /// Explicit column mappings, in declaration order.
    pub column_mappings: Vec<ColumnMapping>,
    /// Columns removed from all consideration, on whichever side they appear.
    pub exclude_columns: Vec<String>,
    /// Pairs compared strictly (zero tolerated out-of-tolerance samples).
    pub compare_columns: Vec<String>,
    /// Pairs expected to differ, judged only on staying within tolerance.
    pub expect_cols: Vec<String>,
    /// Column identifying a row for sampling/keying.
    pub key_column: Option<String>,
    /// Column-value sample batch size.
    pub sample_size: usize,
    /// Per-kind match-rate thresholds.
    pub thresholds: MatchThresholds,
    /// Warnings produced while parsing (unknown keys, dangling segments).
    pub warnings: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            source_table: String::new(),
            target_table: String::new(),
            source_where: None,
            target_where: None,
            tolerance: NumericTolerance::exact(Severity::Hard),
            validation_type: Severity::Hard,
            date_tolerance: None,
            float_tolerance: None,
            string_options: StringOptions::default(),
            decimal_precision: None,
            column_mappings: Vec::new(),
            exclude_columns: Vec::new(),
            compare_columns: Vec::new(),
            expect_cols: Vec::new(),
            key_column: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            thresholds: MatchThresholds::default(),
            warnings: Vec::new(),
        }
    }
}

/// Keys whose values are lists; segments that do not look like a recognized
/// parameter are appended to the most recently opened list, which is how
/// `column_mappings=a=x,b=y` survives comma splitting.
const LIST_KEYS: &[&str] = &[
    "column_mappings",
    "exclude_columns",
    "compare_columns",
    "expect_cols",
    "string_tolerance",
];

const SCALAR_KEYS: &[&str] = &[
    "source_table",
    "target_table",
    "source_where",
    "target_where",
    "tolerance",
    "tolerance_type",
    "validation_type",
    "date_tolerance",
    "float_tolerance",
    "decimal_precision",
    "key_column",
    "sample_size",
    "numeric_threshold",
    "string_threshold",
    "default_threshold",
];

impl ValidationConfig {
    /// Parses the `key=value` mini-language into a typed configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Config`] for a value outside its literal set
    /// (`tolerance_type`, `validation_type`, `string_tolerance`), a negative
    /// tolerance, an unparseable `date_tolerance` or `decimal_precision`, or
    /// a malformed mapping entry. Unknown keys do not fail; they are
    /// collected into [`ValidationConfig::warnings`].
    pub fn parse(params: &str) -> Result<Self> {
        let mut raw = RawParams::default();
        raw.scan(params);

        let mut config = ValidationConfig {
            warnings: raw.warnings.clone(),
            ..Default::default()
        };

        if let Some(v) = raw.scalar("source_table") {
            config.source_table = v.to_string();
        }
        if let Some(v) = raw.scalar("target_table") {
            config.target_table = v.to_string();
        }
        config.source_where = raw.scalar("source_where").map(str::to_string);
        config.target_where = raw.scalar("target_where").map(str::to_string);

        config.validation_type = match raw.scalar("validation_type") {
            None => Severity::Hard,
            Some("hard") => Severity::Hard,
            Some("soft") => Severity::Soft,
            Some(other) => {
                return Err(GuardError::Config(format!(
                    "validation_type must be 'hard' or 'soft', got '{other}'"
                )))
            }
        };

        let mode = match raw.scalar("tolerance_type") {
            None => ToleranceMode::Percentage,
            Some("percentage") => ToleranceMode::Percentage,
            Some("absolute") => ToleranceMode::Absolute,
            Some(other) => {
                return Err(GuardError::Config(format!(
                    "tolerance_type must be 'percentage' or 'absolute', got '{other}'"
                )))
            }
        };
        let value = match raw.scalar("tolerance") {
            None => 0.0,
            Some(v) => v.parse::<f64>().map_err(|_| {
                GuardError::Config(format!("tolerance must be numeric, got '{v}'"))
            })?,
        };
        if value < 0.0 {
            return Err(GuardError::Config(format!(
                "tolerance must be non-negative, got {value}"
            )));
        }
        config.tolerance = NumericTolerance {
            value,
            mode,
            severity: config.validation_type,
        };

        if let Some(v) = raw.scalar("date_tolerance") {
            config.date_tolerance = Some(parse_duration(v)?);
        }

        if let Some(v) = raw.scalar("float_tolerance") {
            config.float_tolerance =
                Some(parse_float_tolerance(v, config.validation_type)?);
        }

        for option in raw.list("string_tolerance") {
            match option.as_str() {
                "case_insensitive" => config.string_options.case_insensitive = true,
                "trim_whitespace" => config.string_options.trim_whitespace = true,
                other => {
                    return Err(GuardError::Config(format!(
                        "string_tolerance option must be 'case_insensitive' or \
                         'trim_whitespace', got '{other}'"
                    )))
                }
            }
        }

        if let Some(v) = raw.scalar("decimal_precision") {
            config.decimal_precision = Some(if v == "exact" {
                DecimalPrecision::Exact
            } else {
                let places = v.parse::<u32>().map_err(|_| {
                    GuardError::Config(format!(
                        "decimal_precision must be an integer or 'exact', got '{v}'"
                    ))
                })?;
                DecimalPrecision::Places(places)
            });
        }

        for entry in raw.list("column_mappings") {
            let (source, target) = entry.split_once('=').ok_or_else(|| {
                GuardError::Config(format!(
                    "column_mappings entry must be 'source=target', got '{entry}'"
                ))
            })?;
            config.column_mappings.push(ColumnMapping {
                source_column: source.trim().to_string(),
                target_column: target.trim().to_string(),
            });
        }

        config.exclude_columns = raw.list("exclude_columns");
        config.compare_columns = raw.list("compare_columns");
        config.expect_cols = raw.list("expect_cols");
        config.key_column = raw.scalar("key_column").map(str::to_string);

        if let Some(v) = raw.scalar("sample_size") {
            let size = v.parse::<usize>().map_err(|_| {
                GuardError::Config(format!("sample_size must be a positive integer, got '{v}'"))
            })?;
            if size == 0 {
                return Err(GuardError::Config(
                    "sample_size must be at least 1".to_string(),
                ));
            }
            config.sample_size = size;
        }

        if let Some(v) = raw.scalar("numeric_threshold") {
            config.thresholds.numeric = parse_threshold("numeric_threshold", v)?;
        }
        if let Some(v) = raw.scalar("string_threshold") {
            config.thresholds.string = parse_threshold("string_threshold", v)?;
        }
        if let Some(v) = raw.scalar("default_threshold") {
            config.thresholds.other = parse_threshold("default_threshold", v)?;
        }

        Ok(config)
    }

    /// Re-emits the explicit mappings in the mini-language form, preserving
    /// declaration order (`a=x,b=y`).
    pub fn mappings_string(&self) -> String {
        self.column_mappings
            .iter()
            .map(ColumnMapping::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The tolerance governing numeric column values: `float_tolerance`
    /// when declared, otherwise the row-count tolerance.
    pub fn numeric_value_tolerance(&self) -> NumericTolerance {
        self.float_tolerance.unwrap_or(self.tolerance)
    }
}

/// Scanned but untyped parameters.
#[derive(Debug, Default)]
struct RawParams {
    scalars: Vec<(String, String)>,
    lists: Vec<(String, Vec<String>)>,
    warnings: Vec<String>,
}

impl RawParams {
    fn scan(&mut self, params: &str) {
        let mut open_list: Option<usize> = None;

        for segment in params.split([',', ';']) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            match segment.split_once('=') {
                Some((key, value)) => {
                    let key_norm = key.trim().to_ascii_lowercase();
                    if SCALAR_KEYS.contains(&key_norm.as_str()) {
                        open_list = None;
                        self.scalars.push((key_norm, value.trim().to_string()));
                    } else if LIST_KEYS.contains(&key_norm.as_str()) {
                        let entries: Vec<String> = value
                            .split('|')
                            .map(|e| e.trim().to_string())
                            .filter(|e| !e.is_empty())
                            .collect();
                        self.lists.push((key_norm, entries));
                        open_list = Some(self.lists.len() - 1);
                    } else if let Some(idx) = open_list {
                        // Continuation of a comma-split list value, e.g. the
                        // `b=y` in `column_mappings=a=x,b=y`.
                        self.lists[idx].1.push(segment.to_string());
                    } else {
                        self.warnings.push(format!("unknown parameter key '{key_norm}'"));
                    }
                }
                None => {
                    if let Some(idx) = open_list {
                        self.lists[idx].1.push(segment.to_string());
                    } else {
                        self.warnings
                            .push(format!("dangling parameter segment '{segment}'"));
                    }
                }
            }
        }
    }

    fn scalar(&self, key: &str) -> Option<&str> {
        // Last declaration wins, matching how the original overlaid params.
        self.scalars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.lists
            .iter()
            .filter(|(k, _)| k == key)
            .flat_map(|(_, entries)| entries.iter().cloned())
            .collect()
    }
}

/// Parses a `"<N> <unit>"` duration, unit in seconds/minutes/hours/days.
fn parse_duration(input: &str) -> Result<Duration> {
    let re = Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(second|minute|hour|day)s?\s*$")
        .map_err(|e| GuardError::Internal(format!("duration pattern: {e}")))?;
    let caps = re.captures(input).ok_or_else(|| {
        GuardError::Config(format!(
            "date_tolerance must be '<N> <unit>' with unit in \
             seconds/minutes/hours/days, got '{input}'"
        ))
    })?;

    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| GuardError::Config(format!("date_tolerance amount in '{input}'")))?;
    let unit_seconds = match caps[2].to_ascii_lowercase().as_str() {
        "second" => 1.0,
        "minute" => 60.0,
        "hour" => 3600.0,
        "day" => 86_400.0,
        _ => unreachable!("pattern restricts the unit"),
    };

    Ok(Duration::milliseconds((amount * unit_seconds * 1000.0) as i64))
}

/// Parses a `float_tolerance` literal: `"5%"` or an absolute value.
fn parse_float_tolerance(input: &str, severity: Severity) -> Result<NumericTolerance> {
    let (text, mode) = match input.strip_suffix('%') {
        Some(rest) => (rest, ToleranceMode::Percentage),
        None => (input, ToleranceMode::Absolute),
    };
    let value: f64 = text.trim().parse().map_err(|_| {
        GuardError::Config(format!(
            "float_tolerance must be a number or 'N%', got '{input}'"
        ))
    })?;
    if value < 0.0 {
        return Err(GuardError::Config(format!(
            "float_tolerance must be non-negative, got {value}"
        )));
    }
    Ok(NumericTolerance {
        value,
        mode,
        severity,
    })
}

fn parse_threshold(key: &str, input: &str) -> Result<f64> {
    let value: f64 = input
        .parse()
        .map_err(|_| GuardError::Config(format!("{key} must be numeric, got '{input}'")))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(GuardError::Config(format!(
            "{key} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(value)
}
