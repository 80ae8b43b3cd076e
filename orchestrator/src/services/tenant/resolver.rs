use std::sync::Arc;

use orchestrator_core::error::TenantError;
use orchestrator_core::tenant::{TenantContext, TenantId};
use tracing::{error, warn};

use super::registry::TenantRegistry;

#[derive(Clone)]
pub struct TenantResolver {
    registry: Arc<dyn TenantRegistry>,
}

impl TenantResolver {
    pub fn new(registry: Arc<dyn TenantRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<dyn TenantRegistry> {
        &self.registry
    }

    /// Resolve a raw, caller supplied tenant identifier.
    pub async fn resolve(&self, raw: Option<&str>) -> Result<TenantContext, TenantError> {
        let tenant_id = TenantId::parse(raw)?;
        self.resolve_id(&tenant_id).await
    }

    /// Resolve an identifier whose presence was already checked.
    pub async fn resolve_id(&self, tenant_id: &TenantId) -> Result<TenantContext, TenantError> {
        let tenant = match self.registry.find(tenant_id).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => {
                warn!("Request for unknown tenant '{}'", tenant_id);
                return Err(TenantError::Invalid);
            }
            Err(e) => {
                error!("Tenant lookup for '{}' failed: {}", tenant_id, e);
                return Err(TenantError::Unavailable);
            }
        };

        TenantContext::from_active(&tenant).inspect_err(|_| {
            warn!(
                "Request for tenant '{}' with status {}",
                tenant_id,
                tenant.status.as_str()
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tenant::registry::{InMemoryTenantRegistry, RegistryError};
    use async_trait::async_trait;
    use orchestrator_core::tenant::{Tenant, TenantStatus};

    fn resolver() -> (TenantResolver, Arc<InMemoryTenantRegistry>) {
        let registry = Arc::new(
            InMemoryTenantRegistry::from_tenants(vec![
                Tenant {
                    id: TenantId::new("lycee-hugo"),
                    name: "Lycée Victor Hugo".to_string(),
                    status: TenantStatus::Active,
                },
                Tenant {
                    id: TenantId::new("college-zola"),
                    name: "Collège Zola".to_string(),
                    status: TenantStatus::Suspended,
                },
            ])
            .unwrap(),
        );
        (TenantResolver::new(registry.clone()), registry)
    }

    struct BrokenRegistry;

    #[async_trait]
    impl TenantRegistry for BrokenRegistry {
        async fn find(&self, _id: &TenantId) -> Result<Option<Tenant>, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }

        async fn list(&self) -> Result<Vec<Tenant>, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }

        async fn set_status(
            &self,
            _id: &TenantId,
            _status: TenantStatus,
        ) -> Result<Tenant, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_resolve_outcomes() {
        let (resolver, _) = resolver();

        assert_eq!(resolver.resolve(None).await, Err(TenantError::Missing));
        assert_eq!(resolver.resolve(Some(" ")).await, Err(TenantError::Missing));
        assert_eq!(
            resolver.resolve(Some("unknown")).await,
            Err(TenantError::Invalid)
        );
        assert_eq!(
            resolver.resolve(Some("college-zola")).await,
            Err(TenantError::Inactive)
        );

        let context = resolver.resolve(Some("lycee-hugo")).await.unwrap();
        assert_eq!(context.tenant_id().as_str(), "lycee-hugo");
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent_while_status_is_unchanged() {
        let (resolver, _) = resolver();
        let first = resolver.resolve(Some("lycee-hugo")).await.unwrap();
        let second = resolver.resolve(Some("lycee-hugo")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_archived_tenant_no_longer_resolves() {
        let (resolver, registry) = resolver();
        registry
            .set_status(&TenantId::new("lycee-hugo"), TenantStatus::Archived)
            .await
            .unwrap();
        assert_eq!(
            resolver.resolve(Some("lycee-hugo")).await,
            Err(TenantError::Inactive)
        );
    }

    #[tokio::test]
    async fn test_registry_outage_is_not_reported_as_unknown_tenant() {
        let resolver = TenantResolver::new(Arc::new(BrokenRegistry));
        assert_eq!(
            resolver.resolve(Some("lycee-hugo")).await,
            Err(TenantError::Unavailable)
        );
    }
}
