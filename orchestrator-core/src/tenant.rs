//! Tenant domain model.
//!
//! Every school account is a tenant. All tenant-scoped data carries exactly
//! one [`TenantId`], and a [`TenantContext`] can only be built for a tenant
//! whose status is [`TenantStatus::Active`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TenantError;

/// Stable identifier of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a caller supplied identifier (header or query parameter).
    ///
    /// Surrounding whitespace is ignored; an absent or blank value is
    /// reported as [`TenantError::Missing`].
    pub fn parse(raw: Option<&str>) -> Result<Self, TenantError> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(TenantError::Missing),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    #[default]
    Active,
    Suspended,
    Archived,
}

impl TenantStatus {
    pub fn is_active(self) -> bool {
        matches!(self, TenantStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Archived => "archived",
        }
    }
}

/// A registered tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    #[serde(default)]
    pub status: TenantStatus,
}

/// Validated tenant scope for a single request.
///
/// Only obtainable through [`TenantContext::from_active`], so holding one
/// proves the tenant existed and was active when the request was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    name: String,
}

impl TenantContext {
    pub fn from_active(tenant: &Tenant) -> Result<Self, TenantError> {
        if !tenant.status.is_active() {
            return Err(TenantError::Inactive);
        }
        Ok(Self {
            tenant_id: tenant.id.clone(),
            name: tenant.name.clone(),
        })
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
