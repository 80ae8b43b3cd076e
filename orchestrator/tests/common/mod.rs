#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::Duration;
use config::{Config, File, FileFormat};
use orchestrator::api::router::ApiRoutes;
use orchestrator::app_state::{AppState, SharedAppState};
use orchestrator::services::audit::{AuditLogger, MemoryAuditSink};
use orchestrator::services::tenant::{InMemoryTenantRegistry, TenantRegistry};
use orchestrator::settings::config::Settings;
use orchestrator_core::identity::{Identity, Role, UserId};
use orchestrator_core::tenant::{Tenant, TenantId, TenantStatus};

pub const TENANT_A: &str = "lycee-hugo";
pub const TENANT_B: &str = "college-zola";
pub const SUSPENDED: &str = "ecole-curie";

const TEST_CONFIG: &str = r#"
auth:
  jwt_secret: integration-test-secret-0123456789abcdef
tenants:
  registry_file: unused.yaml
"#;

pub struct TestApp {
    pub server: TestServer,
    pub state: SharedAppState,
    pub audit: Arc<MemoryAuditSink>,
}

pub fn test_settings() -> Settings {
    let config = Config::builder()
        .add_source(File::from_str(TEST_CONFIG, FileFormat::Yaml))
        .build()
        .unwrap();
    Settings::from_config(config).unwrap()
}

pub fn test_registry() -> InMemoryTenantRegistry {
    let tenant = |id: &str, status| Tenant {
        id: TenantId::new(id),
        name: id.to_string(),
        status,
    };
    InMemoryTenantRegistry::from_tenants(vec![
        tenant(TENANT_A, TenantStatus::Active),
        tenant(TENANT_B, TenantStatus::Active),
        tenant(SUSPENDED, TenantStatus::Suspended),
    ])
    .unwrap()
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_registry(Arc::new(test_registry())).await
}

pub async fn spawn_app_with_registry(registry: Arc<dyn TenantRegistry>) -> TestApp {
    let audit = Arc::new(MemoryAuditSink::default());
    let state = AppState::with_services(test_settings(), registry, AuditLogger::new(audit.clone()))
        .await
        .unwrap();
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();

    TestApp {
        server,
        state,
        audit,
    }
}

impl TestApp {
    pub fn token(&self, user: &str, role: Role, tenant: &str) -> String {
        self.token_with_lifetime(user, role, tenant, Duration::minutes(5))
    }

    pub fn token_with_lifetime(
        &self,
        user: &str,
        role: Role,
        tenant: &str,
        lifetime: Duration,
    ) -> String {
        let identity = Identity::new(UserId::new(user), role, TenantId::new(tenant));
        self.state.tokens.issue(&identity, lifetime).unwrap()
    }
}

/// Attach a bearer credential and a tenant header.
pub fn scoped(request: TestRequest, token: &str, tenant: &str) -> TestRequest {
    with_tenant(with_token(request, token), tenant)
}

pub fn with_token(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

pub fn with_tenant(request: TestRequest, tenant: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("x-tenant-id"),
        HeaderValue::from_str(tenant).unwrap(),
    )
}
