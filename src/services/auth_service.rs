use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::api::dto::LoginRequest;
use crate::auth::{self, JwtService, TokenKind, TokenPair};
use crate::database::models::UserProfile;
use crate::database::UserRepository;
use crate::error::ApiError;

/// Password checked against when the username is unknown
const DUMMY_PASSWORD: &str = "no-such-user";

/// Credential checks and token issuing
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
    bcrypt_cost: u32,
    /// Hash at the configured cost, so unknown users cost as much as wrong passwords
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            jwt,
            bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn dummy_hash(&self) -> Result<String, ApiError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| auth::hash_password(DUMMY_PASSWORD.to_string(), self.bcrypt_cost))
            .await?;
        Ok(hash.clone())
    }

    /// Exchange username/password for a token pair. Unknown users and wrong
    /// passwords produce the same 401.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPair, ApiError> {
        let Some(user) = self.users.find_by_username(&request.username).await? else {
            let _ = auth::verify_password(request.password, self.dummy_hash().await?).await;
            tracing::warn!(username = %request.username, "Login failed: unknown user");
            return Err(ApiError::unauthorized("Invalid credentials"));
        };

        if !auth::verify_password(request.password, user.password.clone()).await? {
            tracing::warn!(username = %user.username, "Login failed: wrong password");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        tracing::info!(username = %user.username, "User logged in");
        Ok(self.jwt.issue_pair(&user.username, user.role())?)
    }

    /// Trade a refresh token for a new pair; the account must still exist
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let claims = self.jwt.validate(refresh_token, TokenKind::Refresh)?;
        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

        Ok(self.jwt.issue_pair(&user.username, user.role())?)
    }

    /// Resolve an access token to the user it was issued for
    pub async fn authenticate_token(&self, token: &str) -> Result<UserProfile, ApiError> {
        let claims = self.jwt.validate(token, TokenKind::Access).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?;

        let user = self.users.find_by_username(&claims.sub).await?.ok_or_else(|| {
            tracing::warn!(username = %claims.sub, "Token subject not found");
            ApiError::unauthorized(format!("User not found with username: {}", claims.sub))
        })?;

        Ok(user.into())
    }
}
