//! Bearer token issuing and validation (HS256).

use anyhow::anyhow;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::Role;
use tracing::debug;

use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::session::Session;

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub role: Role,
    pub name: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    pub fn issue(&self, user_id: &str, role: Role, name: &str) -> DomainResult<String> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.expiration_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                DomainError::Storage(anyhow!(
                    "Token lifetime of {} hours is out of range",
                    self.expiration_hours
                ))
            })?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            name: name.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Storage(anyhow!("Token generation failed: {}", e)))
    }

    /// Decode a token into the session it identifies
    pub fn validate(&self, token: &str) -> DomainResult<Session> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            DomainError::InvalidToken
        })?;

        Ok(Session::new(data.claims.sub, data.claims.role, token))
    }
}
