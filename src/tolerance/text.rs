//! String tolerance comparison.

use super::Evaluation;
use crate::config::StringOptions;

/// Compares strings after applying the configured normalization.
///
/// `trim_whitespace` and `case_insensitive` are independently toggleable
/// and compose: with both set, `"Apple "` and `"APPLE"` are equal.
#[derive(Debug, Clone, Copy)]
pub struct TextComparator {
    options: StringOptions,
}

impl TextComparator {
    /// Creates a comparator with the given options.
    pub fn new(options: StringOptions) -> Self {
        Self { options }
    }

    fn normalize(&self, value: &str) -> String {
        let trimmed = if self.options.trim_whitespace {
            value.trim()
        } else {
            value
        };
        if self.options.case_insensitive {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }

    /// Evaluates a source/target pair.
    pub fn evaluate(&self, source: &str, target: &str) -> Evaluation {
        if self.normalize(source) == self.normalize(target) {
            Evaluation::equal()
        } else {
            Evaluation::mismatch(format!("'{source}' differs from '{target}'"))
        }
    }
}
