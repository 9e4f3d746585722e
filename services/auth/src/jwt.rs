//! JWT service for token generation and validation
//!
//! Access and refresh tokens are HS256 JWTs signed with a single shared
//! secret. Tokens are stateless: validity is decided by the signature and the
//! embedded expiration alone, and there is no revocation. Logging out only
//! drops the cookies on the client, so a captured token stays valid until it
//! expires.

use anyhow::Result;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::config::AppEnvironment;
use crate::models::{Account, Role};

/// Secret used when `JWT_SECRET` is unset outside production
pub const INSECURE_DEVELOPMENT_SECRET: &str = "staykey-development-secret-change-me";

/// Shortest secret accepted in production, in bytes
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Create a config with the default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        JwtConfig {
            secret: secret.into(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }

    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared signing secret. Required in production, where it
    ///   must be at least 32 bytes and differ from the development default.
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    pub fn from_env(environment: AppEnvironment) -> Result<Self> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                anyhow::bail!("JWT_SECRET environment variable must be set in production")
            }
            _ => {
                warn!("JWT_SECRET is not set, using the insecure development secret");
                INSECURE_DEVELOPMENT_SECRET.to_string()
            }
        };

        if environment.is_production() {
            if secret == INSECURE_DEVELOPMENT_SECRET {
                anyhow::bail!("JWT_SECRET must not be the development default in production");
            }
            if secret.len() < MIN_PRODUCTION_SECRET_LEN {
                anyhow::bail!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_PRODUCTION_SECRET_LEN
                );
            }
        }

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string()) // 15 minutes
            .parse()
            .unwrap_or(900);

        let refresh_token_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string()) // 7 days
            .parse()
            .unwrap_or(604800);

        Ok(JwtConfig {
            secret,
            access_token_expiry,
            refresh_token_expiry,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

/// Identity carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for TokenPayload {
    fn from(account: &Account) -> Self {
        TokenPayload {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: Uuid,
    /// Account email
    pub email: String,
    /// Account role at issuance
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

impl Claims {
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            account_id: self.sub,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Why a token was rejected
///
/// Callers in this system collapse every variant into "not authenticated".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("unexpected token type")]
    WrongTokenType,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Sign an access token issued now
    pub fn sign_access(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.sign(payload, TokenType::Access, Utc::now())
    }

    /// Sign a refresh token issued now
    pub fn sign_refresh(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.sign(payload, TokenType::Refresh, Utc::now())
    }

    /// Sign an access token as if issued at `issued_at`
    pub fn sign_access_at(
        &self,
        payload: &TokenPayload,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.sign(payload, TokenType::Access, issued_at)
    }

    /// Sign a refresh token as if issued at `issued_at`
    pub fn sign_refresh_at(
        &self,
        payload: &TokenPayload,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.sign(payload, TokenType::Refresh, issued_at)
    }

    fn sign(
        &self,
        payload: &TokenPayload,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = u64::try_from(issued_at.timestamp()).unwrap_or(0);
        let ttl = match token_type {
            TokenType::Access => self.config.access_token_expiry,
            TokenType::Refresh => self.config.refresh_token_expiry,
        };

        let claims = Claims {
            sub: payload.account_id,
            email: payload.email.clone(),
            role: payload.role,
            iat,
            exp: iat.saturating_add(ttl),
            token_type,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token of either kind and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return its payload
    pub fn verify_access(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_kind(token, TokenType::Access)
    }

    /// Validate a refresh token and return its payload
    pub fn verify_refresh(&self, token: &str) -> Result<TokenPayload, TokenError> {
        self.verify_kind(token, TokenType::Refresh)
    }

    fn verify_kind(&self, token: &str, expected: TokenType) -> Result<TokenPayload, TokenError> {
        let claims = self.verify(token)?;
        if claims.token_type != expected {
            return Err(TokenError::WrongTokenType);
        }
        Ok(claims.payload())
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Get the refresh token expiry time
    pub fn refresh_token_expiry(&self) -> u64 {
        self.config.refresh_token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serial_test::serial;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests-0123456789";

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new(TEST_SECRET))
    }

    fn payload(role: Role) -> TokenPayload {
        TokenPayload {
            account_id: Uuid::new_v4(),
            email: "guest@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn access_token_round_trips_the_payload() {
        let jwt = service();
        let payload = payload(Role::Client);

        let token = jwt.sign_access(&payload).unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.payload(), payload);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(jwt.verify_access(&token).unwrap(), payload);
    }

    #[test]
    fn refresh_token_lives_seven_days() {
        let jwt = service();
        let payload = payload(Role::Admin);

        let token = jwt.sign_refresh(&payload).unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.exp - claims.iat, 604800);
        assert_eq!(jwt.verify_refresh(&token).unwrap(), payload);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let jwt = service();
        let payload = payload(Role::Client);

        let access = jwt.sign_access(&payload).unwrap();
        let refresh = jwt.sign_refresh(&payload).unwrap();

        assert_eq!(jwt.verify_refresh(&access), Err(TokenError::WrongTokenType));
        assert_eq!(jwt.verify_access(&refresh), Err(TokenError::WrongTokenType));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service();
        let issued_at = Utc::now() - Duration::hours(1);

        let token = jwt.sign_access_at(&payload(Role::Admin), issued_at).unwrap();

        assert_eq!(jwt.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let other = JwtService::new(JwtConfig::new("a-completely-different-secret-value!!"));
        let token = other.sign_access(&payload(Role::Client)).unwrap();

        assert_eq!(
            service().verify(&token).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let jwt = service();
        let token = jwt.sign_access(&payload(Role::Client)).unwrap();
        let forged = jwt.sign_access(&payload(Role::Admin)).unwrap();

        // Graft the admin claims onto the client signature
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(
            jwt.verify(&tampered).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let jwt = service();

        assert_eq!(jwt.verify("not-a-jwt").unwrap_err(), TokenError::Malformed);
        assert_eq!(jwt.verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let debug = format!("{:?}", JwtConfig::new(TEST_SECRET));
        assert!(!debug.contains(TEST_SECRET));
    }

    fn clear_env() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
            std::env::remove_var("JWT_REFRESH_TOKEN_EXPIRY");
        }
    }

    #[test]
    #[serial]
    fn development_falls_back_to_the_insecure_default() {
        clear_env();

        let config = JwtConfig::from_env(AppEnvironment::Development).unwrap();
        assert_eq!(config.secret, INSECURE_DEVELOPMENT_SECRET);
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
    }

    #[test]
    #[serial]
    fn production_refuses_missing_default_or_short_secrets() {
        clear_env();
        assert!(JwtConfig::from_env(AppEnvironment::Production).is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", INSECURE_DEVELOPMENT_SECRET);
        }
        assert!(JwtConfig::from_env(AppEnvironment::Production).is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "short");
        }
        assert!(JwtConfig::from_env(AppEnvironment::Production).is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", TEST_SECRET);
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
        }
        let config = JwtConfig::from_env(AppEnvironment::Production).unwrap();
        assert_eq!(config.secret, TEST_SECRET);
        assert_eq!(config.access_token_expiry, 60);

        clear_env();
    }
}
