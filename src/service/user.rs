//! User business logic

use crate::crypto::hash_password;
use crate::domain::{
    CreateUserInput, NewUser, UpdateUserInput, User, ROLE_ADMIN, ROLE_USER, USER_ASSIGNED,
};
use crate::error::{AppError, Result};
use crate::repository::{TaskRepository, UserRepository};
use std::sync::Arc;
use validator::Validate;

/// The authenticated principal performing an operation
#[derive(Debug, Clone, Copy)]
pub struct Caller<'a> {
    pub email: &'a str,
    pub is_admin: bool,
}

impl Caller<'_> {
    /// Accounts may only be changed by their owner or an administrator.
    pub fn ensure_can_manage(&self, target: &User) -> Result<()> {
        if self.is_admin || self.email == target.email {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only modify your own account".to_string(),
            ))
        }
    }
}

pub struct UserService<U: UserRepository, T: TaskRepository> {
    repo: Arc<U>,
    task_repo: Arc<T>,
}

impl<U: UserRepository, T: TaskRepository> UserService<U, T> {
    pub fn new(repo: Arc<U>, task_repo: Arc<T>) -> Self {
        Self { repo, task_repo }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repo.find_by_email(email).await
    }

    pub async fn create(&self, input: CreateUserInput) -> Result<User> {
        input.validate()?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                input.email
            )));
        }

        let user = self
            .repo
            .create(&NewUser {
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                password_hash: hash_password(&input.password)?,
                roles: vec![ROLE_USER.to_string()],
            })
            .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn update(&self, id: i64, input: UpdateUserInput, caller: Caller<'_>) -> Result<User> {
        input.validate()?;

        let mut user = self.get(id).await?;
        caller.ensure_can_manage(&user)?;

        if let Some(email) = input.email {
            if email != user.email {
                if self.repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "User with email '{}' already exists",
                        email
                    )));
                }
                user.email = email;
            }
        }
        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        if let Some(password) = input.password {
            user.password_hash = hash_password(&password)?;
        }

        self.repo.update(&user).await
    }

    pub async fn delete(&self, id: i64, caller: Caller<'_>) -> Result<()> {
        let user = self.get(id).await?;
        caller.ensure_can_manage(&user)?;

        if self.task_repo.exists_by_assignee(id).await? {
            return Err(AppError::BadRequest(USER_ASSIGNED.to_string()));
        }

        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Create the administrator account if no user with that email exists.
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Ok(false);
        }

        self.repo
            .create(&NewUser {
                email: email.to_string(),
                first_name: None,
                last_name: None,
                password_hash: hash_password(password)?,
                roles: vec![ROLE_ADMIN.to_string()],
            })
            .await?;
        Ok(true)
    }
}
