//! Tenant/identity reconciliation rules.
//!
//! The tenant claim in the verified credential is authoritative; any other
//! tenant id a request carries must equal it.

use orchestrator_core::error::MismatchError;
use orchestrator_core::identity::Identity;
use orchestrator_core::tenant::TenantContext;

pub fn reconcile(identity: &Identity, tenant: &TenantContext) -> Result<(), MismatchError> {
    if identity.tenant_claim() != tenant.tenant_id() {
        return Err(MismatchError);
    }
    Ok(())
}

/// Compare a tenant id found in a request body. An absent field passes; a
/// present one must equal the claim exactly, blank and padded values included.
pub fn reconcile_body(identity: &Identity, body_tenant_id: Option<&str>) -> Result<(), MismatchError> {
    match body_tenant_id {
        None => Ok(()),
        Some(body) if body == identity.tenant_claim().as_str() => Ok(()),
        Some(_) => Err(MismatchError),
    }
}
