//! HS256 session tokens.
//!
//! Each token carries the admin's row ID as `sub` and a random `jti` so a
//! single session can be revoked without tracking every issued token.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Token signing configuration, read once at startup and passed through
/// app state — the single source of truth for the session secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing and verifying tokens.
    pub secret: String,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

impl AuthConfig {
    /// Reads `JWT_SECRET` and `JWT_EXPIRY_HOURS` from the environment,
    /// with development defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret_key".to_string());
        let expiry_hours = std::env::var("JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        if secret == "default_secret_key" {
            log::warn!("JWT_SECRET not set; using the development default");
        }

        Self {
            secret,
            expiry_hours,
        }
    }
}

/// JWT claims for an admin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin row ID.
    pub sub: i64,
    /// Random token ID, used by the revocation list.
    pub jti: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Issues a signed token for the given admin ID.
///
/// # Errors
///
/// Returns [`AuthError::TokenInvalid`] if signing fails (malformed key).
pub fn generate(config: &AuthConfig, admin_id: i64) -> Result<String, AuthError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: admin_id,
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(config.expiry_hours)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| {
        log::error!("Failed to sign token: {e}");
        AuthError::TokenInvalid
    })
}

/// Verifies a token's signature and expiry and returns its claims.
///
/// # Errors
///
/// Returns [`AuthError::TokenExpired`] for expired tokens and
/// [`AuthError::TokenInvalid`] for any other verification failure.
pub fn decode(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenInvalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(expiry_hours: i64) -> AuthConfig {
        AuthConfig {
            secret: "test_secret".to_string(),
            expiry_hours,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let config = config(1);
        let token = generate(&config, 42).unwrap();
        let claims = decode(&config, &token).unwrap();
        assert_eq!(claims.sub, 42);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_rejected_distinctly() {
        let config = config(-1);
        let token = generate(&config, 42).unwrap();
        assert!(matches!(
            decode(&config, &token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = generate(&config(1), 42).unwrap();
        let other = AuthConfig {
            secret: "different".to_string(),
            expiry_hours: 1,
        };
        assert!(matches!(decode(&other, &token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert!(matches!(
            decode(&config(1), "not-a-token"),
            Err(AuthError::TokenInvalid)
        ));
    }
}
