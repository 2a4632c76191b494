//! Authentication service: password hashing and JWT handling
//!
//! Provides:
//! - Password hashing and verification with bcrypt
//! - Signed, expiring identity tokens (HS256 JWT)
//! - Token verification into an [`AuthUser`] for the request context

use anyhow::{Result, anyhow};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::{Config, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::db::UserRecord;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username at signing time
    pub username: String,
    /// Email at signing time
    pub email: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Identity of the caller, attached to a request once its token verifies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<TokenClaims> for AuthUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 2 hours)
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Config with the given secret and the default lifetime and cost
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME_SECS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Hash a password with bcrypt.
    ///
    /// Bcrypt is deliberately slow, so this runs on the blocking pool.
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await?
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a bcrypt hash
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await?
            .map_err(|e| anyhow!("Failed to verify password: {}", e))
    }

    /// Sign an identity token for a user
    pub fn sign_token(&self, user: &UserRecord) -> Result<String> {
        let now = Utc::now();
        let exp = Duration::try_seconds(self.config.token_lifetime)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| anyhow!("Token lifetime out of range: {}", self.config.token_lifetime))?;

        let claims = TokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create token: {}", e))
    }

    /// Decode and validate a token (signature and expiry)
    pub fn verify_token(&self, token: &str) -> Result<AuthUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Invalid token: {}", e))?;

        Ok(token_data.claims.into())
    }
}
