//! Signed session tokens.
//!
//! Stateless HS256 tokens carrying the user id and an expiry. Verification
//! is by signature alone; there is no server-side session table, so logout
//! is purely a client-side discard.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id
    pub sub: Uuid,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
    validation: Validation,
}

impl JwtManager {
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        let mut validation = Validation::default();
        // Default leeway is 60s; expiry here is exact.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds: expiry_seconds as i64,
            validation,
        }
    }

    /// Issue a token for the given user.
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.expiry_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal(format!("token encoding failed: {}", e)))
    }

    /// Verify a token and return its claims. Expired tokens and tokens with
    /// a bad signature fail with distinct errors; callers treat both as
    /// unauthenticated.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ServiceError::expired_token()
                }
                _ => ServiceError::invalid_token(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret", 3600)
    }

    #[test]
    fn test_roundtrip() {
        let jwt = manager();
        let user_id = Uuid::new_v4();

        let token = jwt.generate_token(user_id).unwrap();
        let claims = jwt.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let jwt = manager();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = jwt.verify_token(&token).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Auth {
                code: "EXPIRED_TOKEN",
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let jwt = manager();
        let other = JwtManager::new("other-secret", 3600);

        let token = other.generate_token(Uuid::new_v4()).unwrap();
        let err = jwt.verify_token(&token).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Auth {
                code: "INVALID_TOKEN",
                ..
            }
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = manager().verify_token("not.a.jwt").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Auth {
                code: "INVALID_TOKEN",
                ..
            }
        ));
    }
}
