use crate::api::dto::UserRequest;
use crate::auth;
use crate::database::models::{NewUser, UserProfile};
use crate::database::UserRepository;
use crate::error::ApiError;

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: UserRepository, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Hash the password and store the account; duplicates are a 409
    pub async fn create(&self, request: UserRequest) -> Result<UserProfile, ApiError> {
        let role = request.role();
        let password_hash = auth::hash_password(request.password, self.bcrypt_cost).await?;

        let user = self
            .users
            .insert(NewUser {
                username: request.username.trim().to_string(),
                email: request.email.trim().to_string(),
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Created user");
        Ok(user.into())
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, ApiError> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<UserProfile, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ApiError::not_found(format!("User not found with id: {}", id)))
    }
}
