//! Business logic layer

pub mod auth;
pub mod label;
pub mod task;
pub mod task_status;
pub mod user;

pub use auth::AuthService;
pub use label::LabelService;
pub use task::{TaskPage, TaskRepositoryBundle, TaskService};
pub use task_status::TaskStatusService;
pub use user::{Caller, UserService};
