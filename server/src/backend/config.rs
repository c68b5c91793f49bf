// Configuration - Environment variables

use anyhow::{anyhow, Result};
use std::env;
use tracing::warn;

const MIN_SECRET_LEN: usize = 32;
/// One year; longer lifetimes overflow timestamp arithmetic long before they make sense
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// Server configuration loaded from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// sqlx SQLite URL, e.g. `sqlite:kiddo.db`
    pub database_url: String,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,
    /// Origin allowed by CORS (the web client)
    pub cors_origin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("KIDDO_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("KIDDO_PORT must be a port number, got '{}'", raw))?,
            None => 2000,
        };

        let jwt_expiration_hours: i64 = match lookup("JWT_EXPIRATION_HOURS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow!("JWT_EXPIRATION_HOURS must be an integer, got '{}'", raw))?,
            None => 24,
        };

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None => Self::fallback_secret()?,
        };

        Ok(Self {
            host: lookup("KIDDO_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:kiddo.db".to_string()),
            jwt_secret,
            jwt_expiration_hours,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
        })
    }

    #[cfg(debug_assertions)]
    fn fallback_secret() -> Result<String> {
        use rand::distributions::Alphanumeric;
        use rand::Rng;

        warn!("JWT_SECRET not set - using a random per-process secret, tokens will not survive a restart");
        Ok(rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect())
    }

    #[cfg(not(debug_assertions))]
    fn fallback_secret() -> Result<String> {
        Err(anyhow!("JWT_SECRET must be set in release builds"))
    }

    /// Validate values that parse but are unusable
    pub fn validate(&self) -> Result<()> {
        if self.jwt_expiration_hours <= 0 {
            return Err(anyhow!("JWT_EXPIRATION_HOURS must be positive"));
        }
        if self.jwt_expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(anyhow!(
                "JWT_EXPIRATION_HOURS must be at most {}",
                MAX_EXPIRATION_HOURS
            ));
        }
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            warn!(
                "JWT_SECRET is shorter than {} characters - tokens are easy to forge",
                MIN_SECRET_LEN
            );
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            jwt_expiration_hours: 1,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}
