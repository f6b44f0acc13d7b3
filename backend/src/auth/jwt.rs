//! JWT token issuance and validation
//!
//! Tokens are HS256-signed, carry the user id as subject and expire after
//! the configured lifetime. Keys are derived once and shared behind `Arc`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Parse the subject as a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}

/// Pre-computed signing and verification keys
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service. Call once at startup and store in AppState.
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            expiry_secs,
        }
    }

    /// Issue a token for a user
    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    /// Validate a token and return claims
    #[inline]
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_validate_token() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = JwtService::new("other-secret", 3600)
            .issue_token(Uuid::new_v4())
            .unwrap();
        assert!(create_test_service().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60 second leeway
        let service = JwtService::new("test-secret", -120);
        let token = service.issue_token(Uuid::new_v4()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = Claims {
            sub: "42".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(claims.user_id().is_err());
    }
}
