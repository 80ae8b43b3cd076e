//! Signed credential issuance and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use orchestrator_core::error::AuthError;
use orchestrator_core::identity::{Identity, Role, UserId};
use orchestrator_core::settings::auth::AuthSettings;
use orchestrator_core::tenant::TenantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Claims carried by every credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub role: Role,
    pub tenant_id: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign credential: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    default_lifetime: Duration,
}

impl TokenService {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["sub", "exp", "iss"]);
        validation.leeway = settings.leeway_secs;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: settings.issuer.clone(),
            default_lifetime: Duration::seconds(settings.token_lifetime_secs as i64),
        }
    }

    pub fn default_lifetime(&self) -> Duration {
        self.default_lifetime
    }

    /// Mint a credential for `identity`, valid for `lifetime`.
    pub fn issue(&self, identity: &Identity, lifetime: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.user_id().to_string(),
            role: identity.role(),
            tenant_id: identity.tenant_claim().to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify signature, issuer and expiry, then build the identity from the
    /// verified claims only.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                kind => {
                    debug!("Credential rejected: {:?}", kind);
                    AuthError::Invalid
                }
            })?;

        let claims = data.claims;
        let user_id = claims.sub.trim();
        let tenant_id = claims.tenant_id.trim();
        if user_id.is_empty() || tenant_id.is_empty() {
            debug!("Credential rejected: empty subject or tenant claim");
            return Err(AuthError::Invalid);
        }

        Ok(Identity::new(
            UserId::new(user_id),
            claims.role,
            TenantId::new(tenant_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::settings::auth::AuthSettings;

    fn service() -> TokenService {
        TokenService::new(&AuthSettings::with_secret("unit-test-secret"))
    }

    fn teacher() -> Identity {
        Identity::new(
            UserId::new("u-1"),
            Role::Teacher,
            TenantId::new("lycee-hugo"),
        )
    }

    #[test]
    fn issued_credentials_verify_to_the_same_identity() {
        let tokens = service();
        let token = tokens.issue(&teacher(), Duration::minutes(5)).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), teacher());
    }

    #[test]
    fn expired_credentials_are_reported_as_expired() {
        let tokens = service();
        let token = tokens.issue(&teacher(), Duration::minutes(-5)).unwrap();
        assert_eq!(tokens.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let other = TokenService::new(&AuthSettings::with_secret("another-secret"));
        let token = other.issue(&teacher(), Duration::minutes(5)).unwrap();
        assert_eq!(service().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service().verify("not-a-jwt"), Err(AuthError::Invalid));
        assert_eq!(service().verify("a.b.c"), Err(AuthError::Invalid));
    }

    #[test]
    fn unknown_role_claim_is_invalid() {
        let claims = serde_json::json!({
            "sub": "u-1",
            "role": "superuser",
            "tenant_id": "lycee-hugo",
            "iss": "orchestrator",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 300,
            "jti": "j-1",
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(service().verify(&token), Err(AuthError::Invalid));
    }

    #[test]
    fn wrong_issuer_is_invalid() {
        let mut settings = AuthSettings::with_secret("unit-test-secret");
        settings.issuer = "someone-else".to_string();
        let token = TokenService::new(&settings)
            .issue(&teacher(), Duration::minutes(5))
            .unwrap();
        assert_eq!(service().verify(&token), Err(AuthError::Invalid));
    }
}
