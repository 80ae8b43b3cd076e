use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use orchestrator_core::tenant::{Tenant, TenantId, TenantStatus};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tenant not found: {0}")]
    NotFound(TenantId),

    #[error("Tenant registry unavailable: {0}")]
    Unavailable(String),
}

/// Source of truth for tenants and their lifecycle status.
#[async_trait]
pub trait TenantRegistry: Send + Sync {
    async fn find(&self, id: &TenantId) -> Result<Option<Tenant>, RegistryError>;

    async fn list(&self) -> Result<Vec<Tenant>, RegistryError>;

    /// Platform-admin operation; not reachable through tenant-scoped routes.
    async fn set_status(&self, id: &TenantId, status: TenantStatus)
        -> Result<Tenant, RegistryError>;
}

#[derive(Debug, Deserialize)]
struct TenantFile {
    tenants: Vec<Tenant>,
}

/// Registry kept in memory, seeded from a YAML file at startup.
#[derive(Debug, Default)]
pub struct InMemoryTenantRegistry {
    tenants: RwLock<BTreeMap<TenantId, Tenant>>,
}

impl InMemoryTenantRegistry {
    pub fn from_tenants(tenants: impl IntoIterator<Item = Tenant>) -> anyhow::Result<Self> {
        let mut map = BTreeMap::new();
        for tenant in tenants {
            if tenant.id.as_str().trim().is_empty() {
                anyhow::bail!("Tenant with empty id in registry");
            }
            let id = tenant.id.clone();
            if map.insert(id.clone(), tenant).is_some() {
                anyhow::bail!("Duplicate tenant id in registry: {}", id);
            }
        }
        Ok(Self {
            tenants: RwLock::new(map),
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read tenant registry {}", path.display()))?;
        let file: TenantFile =
            serde_norway::from_str(&content).context("Failed to parse tenant registry")?;

        info!(
            "Loaded {} tenants from {}",
            file.tenants.len(),
            path.display()
        );
        Self::from_tenants(file.tenants)
    }
}

#[async_trait]
impl TenantRegistry for InMemoryTenantRegistry {
    async fn find(&self, id: &TenantId) -> Result<Option<Tenant>, RegistryError> {
        Ok(self.tenants.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Tenant>, RegistryError> {
        Ok(self.tenants.read().await.values().cloned().collect())
    }

    async fn set_status(
        &self,
        id: &TenantId,
        status: TenantStatus,
    ) -> Result<Tenant, RegistryError> {
        let mut tenants = self.tenants.write().await;
        let tenant = tenants
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        info!(
            "Tenant {} status {} -> {}",
            id,
            tenant.status.as_str(),
            status.as_str()
        );
        tenant.status = status;
        Ok(tenant.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.yaml");
        tokio::fs::write(
            &path,
            "tenants:\n  - id: lycee-hugo\n    name: Lycée Victor Hugo\n  - id: college-zola\n    name: Collège Zola\n    status: suspended\n",
        )
        .await
        .unwrap();

        let registry = InMemoryTenantRegistry::load(&path).await.unwrap();
        let tenants = registry.list().await.unwrap();
        assert_eq!(tenants.len(), 2);

        let zola = registry
            .find(&TenantId::new("college-zola"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(zola.status, TenantStatus::Suspended);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let tenant = Tenant {
            id: TenantId::new("lycee-hugo"),
            name: "Lycée Victor Hugo".to_string(),
            status: TenantStatus::Active,
        };
        assert!(InMemoryTenantRegistry::from_tenants(vec![tenant.clone(), tenant]).is_err());
    }

    #[tokio::test]
    async fn test_set_status_on_unknown_tenant() {
        let registry = InMemoryTenantRegistry::default();
        let result = registry
            .set_status(&TenantId::new("nowhere"), TenantStatus::Archived)
            .await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }
}
