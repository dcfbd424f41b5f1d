use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::Role;

/// Distinguishes short-lived bearer tokens from the longer-lived refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the principal
    pub sub: String,
    pub role: Role,
    pub typ: TokenKind,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Expected {expected:?} token but got {found:?} token")]
    WrongTokenType { expected: TokenKind, found: TokenKind },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Invalid {0:?} token lifetime")]
    InvalidLifetime(TokenKind),

    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
}

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Reject costs bcrypt would refuse at hashing time
pub fn check_bcrypt_cost(cost: u32) -> Result<u32, AuthError> {
    if (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        Ok(cost)
    } else {
        Err(AuthError::InvalidBcryptCost(cost))
    }
}

/// A lifetime must be positive and still yield a representable expiry
fn token_lifetime(kind: TokenKind, ttl: Option<Duration>) -> Result<Duration, AuthError> {
    match ttl {
        Some(ttl) if ttl > Duration::zero() && Utc::now().checked_add_signed(ttl).is_some() => Ok(ttl),
        _ => Err(AuthError::InvalidLifetime(kind)),
    }
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Lifetime of `token` in seconds
    pub expires_in: i64,
}

/// Signs and verifies HS256 tokens with the configured secret
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(security: &SecurityConfig) -> Result<Self, AuthError> {
        if security.jwt_secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }
        let secret = security.jwt_secret.as_bytes();

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: token_lifetime(
                TokenKind::Access,
                Duration::try_minutes(security.access_token_expiry_minutes),
            )?,
            refresh_ttl: token_lifetime(
                TokenKind::Refresh,
                Duration::try_hours(security.refresh_token_expiry_hours),
            )?,
        })
    }

    pub fn issue(&self, username: &str, role: Role, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: username.to_string(),
            role,
            typ: kind,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .ok_or(AuthError::InvalidLifetime(kind))?
                .timestamp(),
        };
        self.sign(&claims)
    }

    pub fn issue_pair(&self, username: &str, role: Role) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            token: self.issue(username, role, TokenKind::Access)?,
            refresh_token: self.issue(username, role, TokenKind::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Verify signature and expiry, then check the token is of the expected kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.typ != expected {
            return Err(AuthError::WrongTokenType {
                expected,
                found: data.claims.typ,
            });
        }
        Ok(data.claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

/// bcrypt is CPU-bound, so hashing runs off the async workers
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "unit-test-secret".to_string(),
            access_token_expiry_minutes: 50,
            refresh_token_expiry_hours: 24,
            bcrypt_cost: 4,
            cors_origins: vec![],
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        let mut config = security();
        config.jwt_secret.clear();
        assert!(matches!(JwtService::new(&config), Err(AuthError::InvalidSecret)));
    }

    #[test]
    fn access_token_validates_and_carries_username() {
        let jwt = JwtService::new(&security()).unwrap();
        let token = jwt.issue("erika.muster", Role::User, TokenKind::Access).unwrap();

        let claims = jwt.validate(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "erika.muster");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 50 * 60);
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let jwt = JwtService::new(&security()).unwrap();
        let pair = jwt.issue_pair("max.power", Role::User).unwrap();

        assert!(matches!(
            jwt.validate(&pair.refresh_token, TokenKind::Access),
            Err(AuthError::WrongTokenType { .. })
        ));
        assert!(jwt.validate(&pair.token, TokenKind::Refresh).is_err());
        assert!(jwt.validate(&pair.refresh_token, TokenKind::Refresh).is_ok());
        assert_eq!(pair.expires_in, 3000);
        assert_eq!(pair.token_type, "Bearer");
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new(&security()).unwrap();
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: "erika.muster".to_string(),
            role: Role::User,
            typ: TokenKind::Access,
            jti: Uuid::new_v4(),
            iat: past.timestamp(),
            exp: (past + Duration::minutes(50)).timestamp(),
        };
        let token = jwt.sign(&claims).unwrap();

        assert!(matches!(
            jwt.validate(&token, TokenKind::Access),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = JwtService::new(&security()).unwrap();
        let mut other_config = security();
        other_config.jwt_secret = "someone-else".to_string();
        let other = JwtService::new(&other_config).unwrap();

        let token = other.issue("erika.muster", Role::Admin, TokenKind::Access).unwrap();
        assert!(jwt.validate(&token, TokenKind::Access).is_err());
        assert!(jwt.validate("not.a.jwt", TokenKind::Access).is_err());
    }

    #[test]
    fn out_of_range_lifetimes_are_rejected() {
        let mut config = security();
        config.access_token_expiry_minutes = i64::MAX / 2;
        assert!(matches!(
            JwtService::new(&config),
            Err(AuthError::InvalidLifetime(TokenKind::Access))
        ));

        let mut config = security();
        config.refresh_token_expiry_hours = 1_000_000_000_000;
        assert!(matches!(
            JwtService::new(&config),
            Err(AuthError::InvalidLifetime(TokenKind::Refresh))
        ));

        let mut config = security();
        config.access_token_expiry_minutes = 0;
        assert!(JwtService::new(&config).is_err());

        let mut config = security();
        config.refresh_token_expiry_hours = -1;
        assert!(JwtService::new(&config).is_err());
    }

    #[test]
    fn bcrypt_cost_must_be_in_range() {
        assert_eq!(check_bcrypt_cost(4).unwrap(), 4);
        assert_eq!(check_bcrypt_cost(31).unwrap(), 31);
        assert!(matches!(check_bcrypt_cost(3), Err(AuthError::InvalidBcryptCost(3))));
        assert!(matches!(check_bcrypt_cost(40), Err(AuthError::InvalidBcryptCost(40))));
    }

    #[tokio::test]
    async fn password_hash_verifies_only_the_original() {
        let hash = hash_password("password123".to_string(), 4).await.unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("password456".to_string(), hash).await.unwrap());
    }
}
