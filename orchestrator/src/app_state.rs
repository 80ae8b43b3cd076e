use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::services::audit::AuditLogger;
use crate::services::tenant::{InMemoryTenantRegistry, TenantRegistry, TenantResolver};
use crate::services::token::TokenService;
use crate::services::AuthorizationService;
use crate::settings::config::Settings;
use crate::store::SchoolStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub tokens: Arc<TokenService>,
    pub tenants: TenantResolver,
    pub auth_service: Arc<AuthorizationService>,
    pub audit: AuditLogger,
    pub store: SchoolStore,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        Self::from_settings(settings).await
    }

    /// Load the tenant registry and audit sink named in `settings`.
    pub async fn from_settings(settings: Settings) -> anyhow::Result<SharedAppState> {
        let registry = InMemoryTenantRegistry::load(&settings.tenants.registry_file)
            .await
            .context("Failed to load tenant registry")?;
        let audit = AuditLogger::from_settings(&settings.audit).await?;

        Self::with_services(settings, Arc::new(registry), audit).await
    }

    pub async fn with_services(
        settings: Settings,
        registry: Arc<dyn TenantRegistry>,
        audit: AuditLogger,
    ) -> anyhow::Result<SharedAppState> {
        let auth_service = Arc::new(AuthorizationService::new(audit.clone()).await?);
        let tokens = Arc::new(TokenService::new(&settings.auth));

        info!(
            "Tenant header '{}', credential issuer '{}'",
            settings.api.tenant_header, settings.auth.issuer
        );

        Ok(Arc::new(AppState {
            settings,
            tokens,
            tenants: TenantResolver::new(registry),
            auth_service,
            audit,
            store: SchoolStore::new(),
        }))
    }

    pub async fn new_for_config_only() -> anyhow::Result<Settings> {
        Ok(Settings::new()?)
    }
}
