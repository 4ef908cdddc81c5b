//! HS256 session tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::role::RoleName;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User ID
    pub sub: String,
    /// Role at login; authorization re-reads the current role from storage
    pub role: RoleName,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    fn issue(user: &User, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: user.id().to_string(),
            role: user.role_name(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Signing secret and token lifetime
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Issues and verifies session tokens
pub trait JwtGenerator: Send + Sync + Debug {
    fn generate(&self, user: &User) -> Result<String, DomainError>;

    /// Verify signature and expiry; any failure is a `Credential` error
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;
}

/// HMAC-SHA256 implementation of [`JwtGenerator`]
#[derive(Clone)]
pub struct JwtService {
    lifetime: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("lifetime_hours", &self.lifetime.num_hours())
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Build the signer; a blank secret or zero lifetime is a configuration error
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.trim().is_empty() {
            return Err(DomainError::configuration("JWT secret is not defined"));
        }

        let hours = i64::try_from(config.expiration_hours)
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "Invalid token lifetime: {} hours",
                    config.expiration_hours
                ))
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            lifetime: Duration::hours(hours),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<String, DomainError> {
        let claims = JwtClaims::issue(user, Utc::now(), self.lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign session token: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::credential(format!("Invalid token: {}", e)))
    }
}
