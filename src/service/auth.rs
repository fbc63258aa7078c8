//! Credential check and token issuing for `POST /api/login`

use crate::crypto::verify_password;
use crate::domain::LoginInput;
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: Arc<JwtManager>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    /// Verify the credentials and return a signed access token.
    pub async fn login(&self, input: LoginInput) -> Result<String> {
        input
            .validate()
            .map_err(|_| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let user = self
            .user_repo
            .find_by_email(&input.username)
            .await?
            .filter(|user| verify_password(&input.password, &user.password_hash))
            .ok_or_else(|| {
                metrics::counter!("auth_login_total", "result" => "failure").increment(1);
                tracing::info!("Rejected login attempt");
                AppError::Unauthorized("Invalid username or password".to_string())
            })?;

        let token = self
            .jwt_manager
            .create_access_token(&user.email, &user.roles)?;
        metrics::counter!("auth_login_total", "result" => "success").increment(1);
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }
}
