//! Audit log domain model.
//!
//! Records are append-only: they are created once and never updated or
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;
use crate::tenant::TenantId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    Success,
    Denied,
    Error,
}

/// Transport details of the request that produced a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestMetadata {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub actor_user_id: UserId,
    /// What was attempted, e.g. `assignments:update` or `tenant:access`.
    pub action_type: String,
    pub target_type: String,
    pub target_id: Option<String>,
    pub result: AuditResult,
    #[serde(flatten)]
    pub metadata: RequestMetadata,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        tenant_id: TenantId,
        actor_user_id: UserId,
        action_type: impl Into<String>,
        target_type: impl Into<String>,
        result: AuditResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            actor_user_id,
            action_type: action_type.into(),
            target_type: target_type.into(),
            target_id: None,
            result,
            metadata: RequestMetadata::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_flat_columns() {
        let record = AuditRecord::new(
            TenantId::new("lycee-hugo"),
            UserId::new("u-42"),
            "assignments:update",
            "assignments",
            AuditResult::Denied,
        )
        .with_target_id("a-1")
        .with_metadata(RequestMetadata {
            ip: Some("10.0.0.7".to_string()),
            user_agent: Some("curl/8.4".to_string()),
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tenant_id"], "lycee-hugo");
        assert_eq!(value["actor_user_id"], "u-42");
        assert_eq!(value["result"], "denied");
        assert_eq!(value["target_id"], "a-1");
        assert_eq!(value["ip"], "10.0.0.7");
        assert_eq!(value["user_agent"], "curl/8.4");
    }
}
