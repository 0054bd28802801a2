//! Prelude for commonly used types and traits in parity-guard.

pub use crate::config::{NumericTolerance, ToleranceMode, ValidationConfig};
pub use crate::core::{OverallStatus, Severity, ValidationOutcome, VerdictStatus};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::logging::LogConfig;
pub use crate::runner::{run_parallel, ValidationRun};
pub use crate::sources::{DataSampling, SchemaAccess};
