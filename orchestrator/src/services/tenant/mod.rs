//! Tenant resolution: turns a caller-asserted tenant id into a validated
//! [`TenantContext`](orchestrator_core::tenant::TenantContext).

pub mod registry;
pub mod resolver;

pub use registry::{InMemoryTenantRegistry, RegistryError, TenantRegistry};
pub use resolver::TenantResolver;
