use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, ValidationError};
use crate::identity::UserId;
use crate::tenant::TenantId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Class {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    /// Grade level label, e.g. `6e` or `Terminale`.
    pub level: String,
    pub teacher_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CreateClassRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub name: String,
    pub level: String,
    #[serde(default)]
    pub teacher_id: Option<UserId>,
}

impl CreateClassRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("level", &self.level)
    }

    pub fn into_class(self, tenant_id: TenantId) -> Class {
        Class {
            id: Uuid::new_v4(),
            tenant_id,
            name: self.name.trim().to_string(),
            level: self.level.trim().to_string(),
            teacher_id: self.teacher_id,
            created_at: Utc::now(),
        }
    }
}
