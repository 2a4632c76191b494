//! Application configuration management

use std::env;
use std::fmt;

use anyhow::{Context, Result};

/// Default bearer token lifetime: two hours
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Upper bound for TOKEN_LIFETIME_SECS: one year
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite database URL (e.g. `sqlite://./data/bookshelf.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// JWT secret for token signing and verification
    pub jwt_secret: String,

    /// True when no JWT_SECRET was provided and a throwaway one was generated
    pub jwt_secret_generated: bool,

    /// Lifetime of issued tokens in seconds
    pub token_lifetime_secs: i64,

    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/bookshelf.db".to_string());

        // In production JWT_SECRET must be set explicitly; tokens signed with a generated
        // secret stop verifying after a restart.
        let (jwt_secret, jwt_secret_generated) = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => (secret.trim().to_string(), false),
            _ => (format!("dev-secret-{}", uuid::Uuid::new_v4()), true),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            jwt_secret,
            jwt_secret_generated,

            token_lifetime_secs: parse_token_lifetime(env::var("TOKEN_LIFETIME_SECS").ok())?,

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .map(|s| s.parse().context("Invalid BCRYPT_COST"))
                .transpose()?
                .unwrap_or(bcrypt::DEFAULT_COST),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"[redacted]")
            .field("jwt_secret_generated", &self.jwt_secret_generated)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

fn parse_token_lifetime(value: Option<String>) -> Result<i64> {
    let Some(value) = value else {
        return Ok(DEFAULT_TOKEN_LIFETIME_SECS);
    };

    let secs: i64 = value.trim().parse().context("Invalid TOKEN_LIFETIME_SECS")?;
    anyhow::ensure!(
        (1..=MAX_TOKEN_LIFETIME_SECS).contains(&secs),
        "TOKEN_LIFETIME_SECS must be between 1 and {}",
        MAX_TOKEN_LIFETIME_SECS
    );
    Ok(secs)
}
