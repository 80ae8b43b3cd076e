use orchestrator_core::audit::{AuditRecord, AuditResult, RequestMetadata};
use orchestrator_core::identity::Identity;
use orchestrator_core::tenant::{TenantContext, TenantId};

/// Authenticated, tenant-resolved and reconciled scope of one request.
///
/// Only produced by [`AuthorizationService::reconcile`](super::AuthorizationService::reconcile),
/// so handlers receiving one know the credential's tenant claim matches the
/// requested tenant.
#[derive(Debug, Clone)]
pub struct RequestContext {
    identity: Identity,
    tenant: TenantContext,
    metadata: RequestMetadata,
}

impl RequestContext {
    pub(crate) fn new(identity: Identity, tenant: TenantContext, metadata: RequestMetadata) -> Self {
        Self {
            identity,
            tenant,
            metadata,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn tenant(&self) -> &TenantContext {
        &self.tenant
    }

    pub fn tenant_id(&self) -> &TenantId {
        self.tenant.tenant_id()
    }

    pub fn metadata(&self) -> &RequestMetadata {
        &self.metadata
    }

    /// Audit record attributed to this request's actor and tenant.
    pub fn audit_record(
        &self,
        action_type: impl Into<String>,
        target_type: impl Into<String>,
        result: AuditResult,
    ) -> AuditRecord {
        AuditRecord::new(
            self.tenant_id().clone(),
            self.identity.user_id().clone(),
            action_type,
            target_type,
            result,
        )
        .with_metadata(self.metadata.clone())
    }
}
