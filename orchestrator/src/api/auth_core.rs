//! Credential extraction shared by every tenant-scoped route.

use orchestrator_core::error::AuthError;
use orchestrator_core::identity::Identity;

use crate::services::token::TokenService;

/// Authenticate the raw `Authorization` header value. The `Bearer` scheme
/// prefix is optional.
pub fn authenticate(tokens: &TokenService, header: Option<&str>) -> Result<Identity, AuthError> {
    let raw = header.map(str::trim).unwrap_or_default();
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();

    if token.is_empty() {
        return Err(AuthError::Missing);
    }
    tokens.verify(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use orchestrator_core::identity::{Role, UserId};
    use orchestrator_core::settings::auth::AuthSettings;
    use orchestrator_core::tenant::TenantId;

    fn tokens() -> TokenService {
        TokenService::new(&AuthSettings::with_secret("auth-core-secret"))
    }

    #[test]
    fn test_absent_or_blank_header_is_missing() {
        let tokens = tokens();
        assert_eq!(authenticate(&tokens, None), Err(AuthError::Missing));
        assert_eq!(authenticate(&tokens, Some("")), Err(AuthError::Missing));
        assert_eq!(authenticate(&tokens, Some("Bearer   ")), Err(AuthError::Missing));
    }

    #[test]
    fn test_prefix_is_optional() {
        let tokens = tokens();
        let identity = Identity::new(UserId::new("u-1"), Role::Teacher, TenantId::new("t"));
        let token = tokens.issue(&identity, Duration::minutes(1)).unwrap();

        assert_eq!(
            authenticate(&tokens, Some(format!("Bearer {token}").as_str())).unwrap(),
            identity
        );
        assert_eq!(authenticate(&tokens, Some(token.as_str())).unwrap(), identity);
    }

    #[test]
    fn test_unverifiable_token_is_invalid() {
        assert_eq!(
            authenticate(&tokens(), Some("Bearer abc.def.ghi")),
            Err(AuthError::Invalid)
        );
    }
}
