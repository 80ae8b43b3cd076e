pub mod analytics;
pub mod assignments;
pub mod classes;
pub mod health;
pub mod students;

use orchestrator_core::audit::AuditResult;
use uuid::Uuid;

use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::audit::AuditLogger;
use crate::services::authorization::RequestContext;

/// Audit the store outcome of a mutation and pass it on. A failed write is
/// recorded as `error` before it turns into a 500.
pub(crate) async fn record_outcome<T>(
    audit: &AuditLogger,
    ctx: &RequestContext,
    action_type: &str,
    target_type: &str,
    target_id: String,
    outcome: anyhow::Result<T>,
) -> Result<T, AppError> {
    let result = if outcome.is_ok() {
        AuditResult::Success
    } else {
        AuditResult::Error
    };
    audit
        .record(
            ctx.audit_record(action_type, target_type, result)
                .with_target_id(target_id),
        )
        .await;
    outcome.map_err(AppError::from)
}

/// Reject a class reference that does not resolve inside the request's tenant.
pub(crate) async fn ensure_class_in_tenant(
    state: &SharedAppState,
    ctx: &RequestContext,
    class_id: Option<Uuid>,
) -> Result<(), AppError> {
    let Some(class_id) = class_id else {
        return Ok(());
    };
    match state.store.get_class(ctx.tenant_id(), class_id).await {
        Some(_) => Ok(()),
        None => Err(AppError::InvalidInput(format!(
            "class_id {class_id} does not reference a class of this tenant"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use orchestrator_core::audit::RequestMetadata;
    use orchestrator_core::identity::{Identity, Role, UserId};
    use orchestrator_core::tenant::{Tenant, TenantContext, TenantId, TenantStatus};

    use super::*;
    use crate::services::audit::MemoryAuditSink;

    fn context() -> RequestContext {
        let tenant = TenantContext::from_active(&Tenant {
            id: TenantId::new("lycee-hugo"),
            name: "Lycée Victor Hugo".to_string(),
            status: TenantStatus::Active,
        })
        .unwrap();
        let identity = Identity::new(UserId::new("dir-1"), Role::Direction, TenantId::new("lycee-hugo"));
        RequestContext::new(identity, tenant, RequestMetadata::default())
    }

    #[tokio::test]
    async fn test_failed_write_is_audited_as_error() {
        let sink = Arc::new(MemoryAuditSink::default());
        let audit = AuditLogger::new(sink.clone());

        let outcome: anyhow::Result<()> = Err(anyhow::anyhow!("partition vanished"));
        let result =
            record_outcome(&audit, &context(), "assignments:update", "assignments", "a-1".into(), outcome)
                .await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        let records = sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, AuditResult::Error);
        assert_eq!(records[0].action_type, "assignments:update");
        assert_eq!(records[0].target_id.as_deref(), Some("a-1"));
    }

    #[tokio::test]
    async fn test_successful_write_is_audited_as_success() {
        let sink = Arc::new(MemoryAuditSink::default());
        let audit = AuditLogger::new(sink.clone());

        let value = record_outcome(&audit, &context(), "classes:create", "classes", "c-1".into(), Ok(7))
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(sink.records().await[0].result, AuditResult::Success);
    }
}
