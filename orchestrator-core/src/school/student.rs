use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, ValidationError};
use crate::tenant::TenantId;

/// Engagement figures feeding the risk heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct LearningSignals {
    /// Average grade, 0 to 100.
    pub average_score: f64,
    /// Share of assignments handed in, 0 to 1.
    pub completion_rate: f64,
    pub days_inactive: u32,
}

impl Default for LearningSignals {
    fn default() -> Self {
        Self {
            average_score: 100.0,
            completion_rate: 1.0,
            days_inactive: 0,
        }
    }
}

impl LearningSignals {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=100.0).contains(&self.average_score) {
            return Err(ValidationError(
                "average_score must be between 0 and 100".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.completion_rate) {
            return Err(ValidationError(
                "completion_rate must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Student {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<Uuid>,
    pub signals: LearningSignals,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct CreateStudentRequest {
    /// Sent by legacy clients; must match the authenticated tenant.
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub signals: LearningSignals,
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        self.signals.validate()
    }

    pub fn into_student(self, tenant_id: TenantId) -> Student {
        Student {
            id: Uuid::new_v4(),
            tenant_id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            class_id: self.class_id,
            signals: self.signals,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_outside_their_range_are_rejected() {
        let request: CreateStudentRequest = serde_json::from_value(serde_json::json!({
            "first_name": "Léa",
            "last_name": "Martin",
            "signals": { "average_score": 130.0, "completion_rate": 0.5, "days_inactive": 0 }
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        let request: CreateStudentRequest = serde_json::from_value(serde_json::json!({
            "first_name": "  ",
            "last_name": "Martin"
        }))
        .unwrap();
        assert_eq!(
            request.validate(),
            Err(ValidationError("first_name must not be empty".to_string()))
        );
    }
}
