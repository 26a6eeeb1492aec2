//! Result type alias used across the workspace.

use crate::MelosError;

/// Result alias with `MelosError` as the error type.
pub type MelosResult<T> = Result<T, MelosError>;
