use std::sync::Arc;

use anyhow::{Context, Result};
use casbin::CachedEnforcer;
use orchestrator_core::audit::{AuditRecord, AuditResult, RequestMetadata};
use orchestrator_core::error::{ForbiddenError, MismatchError};
use orchestrator_core::identity::{Identity, Role, UserId};
use orchestrator_core::permission::{
    self, Action, OwnershipPolicy, PermissionKey, ResourceCategory,
};
use orchestrator_core::tenant::TenantContext;
use tracing::{debug, info, warn};

use super::casbin::CasbinManager;
use super::context::RequestContext;
use super::reconcile;
use crate::services::audit::AuditLogger;

/// Action type of audit records written for tenant mismatches.
pub const TENANT_ACCESS_ACTION: &str = "tenant:access";
pub const TENANT_WRITE_ACTION: &str = "tenant:write";

/// Request-time RBAC enforcement backed by the compiled permission table.
#[derive(Clone)]
pub struct AuthorizationService {
    enforcer: Arc<CachedEnforcer>,
    audit: AuditLogger,
}

impl AuthorizationService {
    /// Verify the permission table, load it into casbin and check both agree.
    pub async fn new(audit: AuditLogger) -> Result<Self> {
        permission::verify().context("Permission table is inconsistent")?;
        let enforcer = CasbinManager::build_enforcer()
            .await
            .context("Failed to create Casbin enforcer")?;

        info!(
            "Authorization service ready: {} roles, {} policies",
            Role::all().len(),
            permission::allowed_triples().len()
        );

        Ok(Self {
            enforcer: Arc::new(enforcer),
            audit,
        })
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Casbin lookup; an enforcer error counts as a denial.
    pub fn is_allowed(&self, role: Role, category: ResourceCategory, action: Action) -> bool {
        let result = CasbinManager::enforce(&self.enforcer, role, category, action)
            .unwrap_or_else(|e| {
                warn!("Casbin enforcement failed, denying: {}", e);
                false
            });
        debug!(
            "Checking permission: role='{}', permission='{}:{}' -> {}",
            role,
            category.as_str(),
            action.as_str(),
            result
        );
        result
    }

    pub fn is_allowed_any(&self, role: Role, category: ResourceCategory, actions: &[Action]) -> bool {
        actions
            .iter()
            .any(|action| self.is_allowed(role, category, *action))
    }

    /// Build the request context after checking the credential's tenant claim
    /// against the resolved tenant. A mismatch is audited under the claimed
    /// tenant, targeting the requested one.
    pub async fn reconcile(
        &self,
        identity: Identity,
        tenant: TenantContext,
        metadata: RequestMetadata,
    ) -> Result<RequestContext, MismatchError> {
        if let Err(e) = reconcile::reconcile(&identity, &tenant) {
            warn!(
                "Tenant mismatch: user '{}' with claim '{}' requested tenant '{}'",
                identity.user_id(),
                identity.tenant_claim(),
                tenant.tenant_id()
            );
            self.audit
                .record(
                    AuditRecord::new(
                        identity.tenant_claim().clone(),
                        identity.user_id().clone(),
                        TENANT_ACCESS_ACTION,
                        "tenant",
                        AuditResult::Denied,
                    )
                    .with_target_id(tenant.tenant_id().as_str())
                    .with_metadata(metadata),
                )
                .await;
            return Err(e);
        }
        Ok(RequestContext::new(identity, tenant, metadata))
    }

    /// Check a tenant id carried in a write request's body.
    pub async fn reconcile_body(
        &self,
        ctx: &RequestContext,
        body_tenant_id: Option<&str>,
    ) -> Result<(), MismatchError> {
        if let Err(e) = reconcile::reconcile_body(ctx.identity(), body_tenant_id) {
            warn!(
                "Tenant mismatch in request body: user '{}' in tenant '{}' sent '{}'",
                ctx.identity().user_id(),
                ctx.tenant_id(),
                body_tenant_id.unwrap_or_default()
            );
            let mut record = ctx.audit_record(TENANT_WRITE_ACTION, "tenant", AuditResult::Denied);
            if let Some(body) = body_tenant_id {
                record = record.with_target_id(body);
            }
            self.audit.record(record).await;
            return Err(e);
        }
        Ok(())
    }

    /// Plain permission check. Actions the role only holds for resources it
    /// owns are refused here; use [`Self::require_owned_or_elevated`].
    pub async fn require_permission(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        action: Action,
    ) -> Result<(), ForbiddenError> {
        let role = ctx.identity().role();
        let required_permission = PermissionKey::new(category, action);

        if !self.is_allowed(role, category, action) {
            return self
                .deny(ctx, ForbiddenError::PermissionDenied { required_permission }, None)
                .await;
        }
        if permission::grant(role, category).is_owner_scoped(action)
            && permission::ownership_policy(role) == OwnershipPolicy::RequireOwner
        {
            return self
                .deny(ctx, ForbiddenError::NotOwner { required_permission }, None)
                .await;
        }
        Ok(())
    }

    /// Table-only check for actions whose target still has to be loaded.
    /// Ownership is settled afterwards by [`Self::require_owned_or_elevated`].
    pub async fn require_grant(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        action: Action,
    ) -> Result<(), ForbiddenError> {
        if self.is_allowed(ctx.identity().role(), category, action) {
            return Ok(());
        }
        self.deny(
            ctx,
            ForbiddenError::PermissionDenied {
                required_permission: PermissionKey::new(category, action),
            },
            None,
        )
        .await
    }

    /// Permission check plus ownership: elevated roles skip the owner
    /// comparison, other roles must own the resource when the grant marks
    /// the action as owner-scoped.
    pub async fn require_owned_or_elevated(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        action: Action,
        resource_id: &str,
        owner_id: &UserId,
    ) -> Result<(), ForbiddenError> {
        let identity = ctx.identity();
        let required_permission = PermissionKey::new(category, action);

        if !self.is_allowed(identity.role(), category, action) {
            return self
                .deny(
                    ctx,
                    ForbiddenError::PermissionDenied { required_permission },
                    Some(resource_id),
                )
                .await;
        }

        let owner_scoped = permission::grant(identity.role(), category).is_owner_scoped(action);
        match permission::ownership_policy(identity.role()) {
            OwnershipPolicy::Bypass => Ok(()),
            OwnershipPolicy::RequireOwner if !owner_scoped => Ok(()),
            OwnershipPolicy::RequireOwner if identity.user_id() == owner_id => Ok(()),
            OwnershipPolicy::RequireOwner => {
                self.deny(
                    ctx,
                    ForbiddenError::NotOwner { required_permission },
                    Some(resource_id),
                )
                .await
            }
        }
    }

    /// Succeeds when any of `actions` is allowed. A denial reports the first
    /// listed action.
    pub async fn require_any(
        &self,
        ctx: &RequestContext,
        category: ResourceCategory,
        actions: &[Action],
    ) -> Result<(), ForbiddenError> {
        if self.is_allowed_any(ctx.identity().role(), category, actions) {
            return Ok(());
        }
        let action = actions.first().copied().unwrap_or(Action::Read);
        self.deny(
            ctx,
            ForbiddenError::PermissionDenied {
                required_permission: PermissionKey::new(category, action),
            },
            None,
        )
        .await
    }

    async fn deny(
        &self,
        ctx: &RequestContext,
        error: ForbiddenError,
        resource_id: Option<&str>,
    ) -> Result<(), ForbiddenError> {
        let required_permission = error.required_permission();
        info!(
            "Permission denied: user '{}' ({}) in tenant '{}' lacks {} ({})",
            ctx.identity().user_id(),
            ctx.identity().role(),
            ctx.tenant_id(),
            required_permission,
            error.reason().as_str()
        );

        let mut record = ctx.audit_record(
            required_permission.to_string(),
            required_permission.category.as_str(),
            AuditResult::Denied,
        );
        if let Some(resource_id) = resource_id {
            record = record.with_target_id(resource_id);
        }
        self.audit.record(record).await;

        Err(error)
    }
}
