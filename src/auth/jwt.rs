//! JWT token management
//!
//! Handles creation and validation of administrator access tokens.

use crate::error::AppError;
use crate::models::AdminUser;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (admin user ID)
    pub sub: Uuid,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Login response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBody {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub admin: AdminUser,
}

/// Signing keys and token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_minutes * 60
    }

    /// Create an access token for an administrator
    pub fn create_token(&self, admin_id: Uuid, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin_id,
            email: email.to_string(),
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to create access token: {}", e)))
    }

    /// Decode and validate a token
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expired".to_string()),
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_round_trip() {
        let keys = JwtKeys::new("test-secret", 60);
        let id = Uuid::new_v4();

        let token = keys.create_token(id, "admin@example.com").unwrap();
        let claims = keys.decode_token(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.exp - claims.iat, keys.ttl_seconds());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = JwtKeys::new("one", 60).create_token(Uuid::new_v4(), "a@b.io").unwrap();
        let err = JwtKeys::new("two", 60).decode_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = JwtKeys::new("test-secret", -10);
        let token = keys.create_token(Uuid::new_v4(), "a@b.io").unwrap();
        let err = keys.decode_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token expired"));
    }
}
