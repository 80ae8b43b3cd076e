use config::{Config, ConfigError, Environment, File};
use orchestrator_core::settings::{
    analytics::AnalyticsSettings, api_server::ApiServer, audit::AuditSettings,
    audit::AuditSinkKind, auth::AuthSettings, auth::MIN_SECRET_LEN, tenants::TenantSettings,
};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub api: ApiServer,
    pub auth: AuthSettings,
    #[serde(default)]
    pub tenants: TenantSettings,
    #[serde(default)]
    pub audit: AuditSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("ORCHESTRATOR")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("ORCHESTRATOR_RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .set_default("api.bind_address", "0.0.0.0:21380")?
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment())
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already layered configuration.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be configured".into(),
            ));
        }
        if !self.debug && self.auth.jwt_secret.is_weak() {
            return Err(ConfigError::Message(format!(
                "auth.jwt_secret must be replaced by a secret of at least {MIN_SECRET_LEN} bytes \
                 (only debug mode accepts the placeholder)"
            )));
        }
        if self.audit.sink == AuditSinkKind::File && self.audit.path.is_none() {
            return Err(ConfigError::Message(
                "audit.path is required when audit.sink is 'file'".into(),
            ));
        }
        let weights = &self.analytics.weights;
        if weights.score < 0.0 || weights.completion < 0.0 || weights.inactivity < 0.0 {
            return Err(ConfigError::Message(
                "analytics.weights must not be negative".into(),
            ));
        }
        if self.analytics.thresholds.medium > self.analytics.thresholds.high {
            return Err(ConfigError::Message(
                "analytics.thresholds.medium must not exceed analytics.thresholds.high".into(),
            ));
        }
        Ok(())
    }
}
