use anyhow::Result;
use casbin::prelude::*;
use orchestrator_core::identity::Role;
use orchestrator_core::permission::{self, Action, ResourceCategory};
use tracing::{debug, info};

/// Role-only RBAC: no user groupings, the subject is the role name.
const MODEL: &str = r#"[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
"#;

/// Casbin-specific operations and policy management
pub struct CasbinManager;

impl CasbinManager {
    /// Build an enforcer holding exactly the compiled permission table.
    pub async fn build_enforcer() -> Result<CachedEnforcer> {
        let model = DefaultModel::from_str(MODEL).await?;
        let adapter = MemoryAdapter::default();
        let mut enforcer = CachedEnforcer::new(model, adapter).await?;

        Self::sync_permission_table(&mut enforcer).await?;
        Self::verify_against_table(&enforcer)?;

        Ok(enforcer)
    }

    /// Replace all policies with the compiled permission table.
    pub async fn sync_permission_table(enforcer: &mut CachedEnforcer) -> Result<()> {
        info!("Starting Casbin policy synchronization");

        let _ = enforcer.clear_policy().await;

        let policies: Vec<Vec<String>> = permission::allowed_triples()
            .into_iter()
            .map(|(role, category, action)| {
                debug!(
                    "Adding p: {} {} {}",
                    role.as_str(),
                    category.as_str(),
                    action.as_str()
                );
                vec![
                    role.as_str().to_string(),
                    category.as_str().to_string(),
                    action.as_str().to_string(),
                ]
            })
            .collect();
        let count = policies.len();
        enforcer.add_policies(policies).await?;

        info!("Casbin policy synchronization completed ({} policies)", count);
        Ok(())
    }

    /// Fail unless casbin and the table agree on every combination.
    pub fn verify_against_table(enforcer: &CachedEnforcer) -> Result<()> {
        for role in Role::all() {
            for category in ResourceCategory::all() {
                for action in Action::all() {
                    let expected = permission::is_allowed(role, category, action);
                    let actual = Self::enforce(enforcer, role, category, action)?;
                    if expected != actual {
                        anyhow::bail!(
                            "Casbin policy disagrees with permission table for {} {}:{} (table: {}, casbin: {})",
                            role,
                            category.as_str(),
                            action.as_str(),
                            expected,
                            actual
                        );
                    }
                }
            }
        }
        Ok(())
    }

    pub fn enforce(
        enforcer: &CachedEnforcer,
        role: Role,
        category: ResourceCategory,
        action: Action,
    ) -> Result<bool> {
        Ok(enforcer.enforce(vec![role.as_str(), category.as_str(), action.as_str()])?)
    }
}
