//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the same router serves
//! the PostgreSQL-backed state in production and the in-memory state
//! in local runs and tests.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{LabelRepository, TaskRepository, TaskStatusRepository, UserRepository};
use crate::service::{AuthService, LabelService, TaskService, TaskStatusService, UserService};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user repository type
    type UserRepo: UserRepository;
    /// The task status repository type
    type TaskStatusRepo: TaskStatusRepository;
    /// The label repository type
    type LabelRepo: LabelRepository;
    /// The task repository type
    type TaskRepo: TaskRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Get the login service
    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    /// Get the user service
    fn user_service(&self) -> &UserService<Self::UserRepo, Self::TaskRepo>;

    /// Get the task status service
    fn task_status_service(&self) -> &TaskStatusService<Self::TaskStatusRepo, Self::TaskRepo>;

    /// Get the label service
    fn label_service(&self) -> &LabelService<Self::LabelRepo, Self::TaskRepo>;

    /// Get the task service
    fn task_service(
        &self,
    ) -> &TaskService<Self::TaskRepo, Self::TaskStatusRepo, Self::UserRepo, Self::LabelRepo>;

    /// Check if the backing store answers
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
