//! Error types for the parity-guard validation engine.
//!
//! Only two classes of problem are surfaced as errors: configuration defects
//! (the test is malformed and must abort before any comparison runs) and
//! infrastructure failures reported by a collaborator (the test could not
//! run). Every data-level disagreement is represented as a structured
//! finding inside a [`crate::core::ValidationOutcome`], never as an error,
//! so that one execution yields exactly one outcome unless aborted.

use thiserror::Error;

/// Errors that can abort a validation run.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Malformed or contradictory configuration (bad enum literal, negative
    /// tolerance, unparseable duration). Raised before any comparison runs.
    #[error("configuration error: {0}")]
    Config(String),

    /// A collaborator (schema access or data sampling) failed. Reported as
    /// an execution error, never conflated with a data-mismatch verdict.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// An invariant inside the engine was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GuardError {
    /// Returns true if this error represents a configuration defect.
    pub fn is_config(&self) -> bool {
        matches!(self, GuardError::Config(_))
    }

    /// Returns true if this error came from a collaborator.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, GuardError::Infrastructure(_))
    }
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Extension trait for attaching context while converting collaborator
/// errors into [`GuardError::Infrastructure`].
pub trait ErrorContext<T> {
    /// Wraps the error with a description of the operation that failed.
    fn infra_context(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn infra_context(self, context: &str) -> Result<T> {
        self.map_err(|e| GuardError::Infrastructure(format!("{context}: {e}")))
    }
}
