use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct TenantSettings {
    /// YAML file seeding the tenant registry.
    #[serde(default = "default_registry_file")]
    pub registry_file: String,
}

fn default_registry_file() -> String {
    "config/tenants.yaml".to_string()
}

impl Default for TenantSettings {
    fn default() -> Self {
        Self {
            registry_file: default_registry_file(),
        }
    }
}
