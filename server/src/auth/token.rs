//! Signed bearer tokens carrying the user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 tokens with a fixed lifetime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: Uuid, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: issued_at + self.ttl.num_seconds(),
            iat: issued_at,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the signature and expiry, returning the user id the token was issued to.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| TokenError::Invalid("subject is not a user id".to_string()))
    }
}
