//! Tenant-scoped school entities served by the resource handlers.

pub mod assignment;
pub mod class;
pub mod student;

use thiserror::Error;

/// Rejected request payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    Ok(())
}
