//! Data access layer (Repository pattern)

pub mod label;
pub mod memory;
pub mod task;
pub mod task_status;
pub mod user;

pub use label::{LabelRepository, LabelRepositoryImpl};
pub use memory::{
    InMemoryLabelRepository, InMemoryTaskRepository, InMemoryTaskStatusRepository,
    InMemoryUserRepository, MemoryStore,
};
pub use task::{TaskRepository, TaskRepositoryImpl};
pub use task_status::{TaskStatusRepository, TaskStatusRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl};
