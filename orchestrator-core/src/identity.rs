//! Authenticated actor of a request.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

/// Closed set of roles a credential can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Direction,
    Teacher,
    Intervenant,
    Inspector,
    StudentProxy,
}

impl Role {
    pub fn all() -> [Role; 6] {
        [
            Role::Admin,
            Role::Direction,
            Role::Teacher,
            Role::Intervenant,
            Role::Inspector,
            Role::StudentProxy,
        ]
    }

    /// Name used in credentials and in the casbin policy
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Direction => "direction",
            Role::Teacher => "teacher",
            Role::Intervenant => "intervenant",
            Role::Inspector => "inspector",
            Role::StudentProxy => "student_proxy",
        }
    }

    /// Parse from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Role> {
        Role::all().into_iter().find(|role| role.as_str() == s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity extracted from a verified credential.
///
/// Rebuilt on every request; fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
    tenant_claim: TenantId,
}

impl Identity {
    pub fn new(user_id: UserId, role: Role, tenant_claim: TenantId) -> Self {
        Self {
            user_id,
            role,
            tenant_claim,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Tenant the credential was issued for. Authoritative over any
    /// tenant id the request carries elsewhere.
    pub fn tenant_claim(&self) -> &TenantId {
        &self.tenant_claim
    }
}
