//! Authorization failure taxonomy.
//!
//! Every variant is terminal for the request it occurs in. The HTTP layer
//! maps them to status codes and stable error codes in one place.

use thiserror::Error;

use crate::permission::PermissionKey;

/// Credential verification failures.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing credential")]
    Missing,

    #[error("Invalid credential")]
    Invalid,

    #[error("Credential has expired")]
    Expired,
}

/// Tenant resolution failures.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TenantError {
    #[error("Missing tenant identifier")]
    Missing,

    #[error("Unknown tenant")]
    Invalid,

    #[error("Tenant is not active")]
    Inactive,

    /// The registry could not be queried. Never reported as `Invalid`.
    #[error("Tenant registry unavailable")]
    Unavailable,
}

/// The credential was issued for another tenant than the one requested.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Tenant does not match the authenticated identity")]
pub struct MismatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    PermissionDenied,
    NotOwner,
}

impl ForbiddenReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ForbiddenReason::PermissionDenied => "permission_denied",
            ForbiddenReason::NotOwner => "not_owner",
        }
    }
}

/// RBAC denials.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ForbiddenError {
    #[error("Missing permission {required_permission}")]
    PermissionDenied { required_permission: PermissionKey },

    #[error("Only the owner may {required_permission} this resource")]
    NotOwner { required_permission: PermissionKey },
}

impl ForbiddenError {
    pub fn reason(&self) -> ForbiddenReason {
        match self {
            ForbiddenError::PermissionDenied { .. } => ForbiddenReason::PermissionDenied,
            ForbiddenError::NotOwner { .. } => ForbiddenReason::NotOwner,
        }
    }

    pub fn required_permission(&self) -> PermissionKey {
        match self {
            ForbiddenError::PermissionDenied {
                required_permission,
            }
            | ForbiddenError::NotOwner {
                required_permission,
            } => *required_permission,
        }
    }
}
