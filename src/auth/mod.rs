use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Session token claims: the subject is the user id plus its role.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i32, role: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_secs = config::config().security.jwt_expiry_secs;

        Self {
            user_id,
            role: role.into(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token generation failed: {0}")]
    Generation(String),

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Sign a session token with the given secret.
pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| TokenError::Generation(e.to_string()))
}

/// Decode and validate a session token. Expiry is enforced.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })
}

/// Hash a raw password for storage.
pub fn hash_password(raw: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(raw, bcrypt::DEFAULT_COST)
}

/// Check a raw password against a stored hash.
pub fn verify_password(raw: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(raw, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let claims = Claims::new(42, "ADMIN");
        let token = generate_token(&claims, "unit-test-secret").unwrap();
        let decoded = verify_token(&token, "unit-test-secret").unwrap();
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.role, "ADMIN");
    }

    #[test]
    fn rejects_wrong_secret() {
        let claims = Claims::new(1, "USER");
        let token = generate_token(&claims, "secret-a").unwrap();
        assert!(matches!(verify_token(&token, "secret-b"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now();
        let claims = Claims {
            user_id: 1,
            role: "USER".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = generate_token(&claims, "unit-test-secret").unwrap();
        assert!(matches!(verify_token(&token, "unit-test-secret"), Err(TokenError::Expired)));
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(verify_token("whatever", ""), Err(TokenError::MissingSecret)));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
