use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// HMAC key used to sign and verify credentials.
///
/// Zeroized on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct SigningSecret(SecretString);

impl SigningSecret {
    pub fn new(value: String) -> Self {
        Self(SecretString::new(value.into_boxed_str()))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// The shipped placeholder, or too short to resist brute force.
    pub fn is_weak(&self) -> bool {
        let secret = self.0.expose_secret();
        secret == PLACEHOLDER_SECRET || secret.len() < MIN_SECRET_LEN
    }
}

/// Value of `auth.jwt_secret` in `config/default.yaml`.
pub const PLACEHOLDER_SECRET: &str = "change-me";
pub const MIN_SECRET_LEN: usize = 32;

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"********\"")
    }
}

impl<'de> Deserialize<'de> for SigningSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(SigningSecret::new(value))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub jwt_secret: SigningSecret,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Lifetime of credentials minted by `issue-token`.
    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: u64,
    /// Clock skew tolerated when checking expiry.
    #[serde(default)]
    pub leeway_secs: u64,
}

pub const DEFAULT_ISSUER: &str = "orchestrator";

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_token_lifetime_secs() -> u64 {
    3600
}

impl AuthSettings {
    pub fn with_secret(secret: &str) -> Self {
        Self {
            jwt_secret: SigningSecret::new(secret.to_string()),
            issuer: default_issuer(),
            token_lifetime_secs: default_token_lifetime_secs(),
            leeway_secs: 0,
        }
    }
}
