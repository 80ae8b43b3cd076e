use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, ValidationError};
use crate::identity::UserId;
use crate::tenant::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Teacher-authored work item. `owner_id` is the author and drives
/// ownership scoping of updates and deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Assignment {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub title: String,
    pub description: Option<String>,
    pub class_id: Option<Uuid>,
    pub owner_id: UserId,
    pub status: AssignmentStatus,
    pub due_at: Option<DateTime<Utc>>,
    pub validated_by: Option<UserId>,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn apply(&mut self, update: UpdateAssignmentRequest) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(due_at) = update.due_at {
            self.due_at = Some(due_at);
        }
        self.updated_at = Utc::now();
    }

    pub fn mark_validated(&mut self, validator: UserId) {
        let now = Utc::now();
        self.validated_by = Some(validator);
        self.validated_at = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CreateAssignmentRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

impl CreateAssignmentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }

    pub fn into_assignment(self, tenant_id: TenantId, owner_id: UserId) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: Uuid::new_v4(),
            tenant_id,
            title: self.title.trim().to_string(),
            description: self.description,
            class_id: self.class_id,
            owner_id,
            status: AssignmentStatus::Draft,
            due_at: self.due_at,
            validated_by: None,
            validated_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<AssignmentStatus>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

impl UpdateAssignmentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_only_touches_provided_fields() {
        let mut assignment = CreateAssignmentRequest {
            tenant_id: None,
            title: "Fractions".to_string(),
            description: Some("Chapitre 3".to_string()),
            class_id: None,
            due_at: None,
        }
        .into_assignment(TenantId::new("lycee-hugo"), UserId::new("u-1"));

        assignment.apply(UpdateAssignmentRequest {
            status: Some(AssignmentStatus::Published),
            ..Default::default()
        });

        assert_eq!(assignment.title, "Fractions");
        assert_eq!(assignment.description.as_deref(), Some("Chapitre 3"));
        assert_eq!(assignment.status, AssignmentStatus::Published);
        assert_eq!(assignment.owner_id, UserId::new("u-1"));
    }
}
