//! Domain models for the task manager

pub mod common;
pub mod label;
pub mod task;
pub mod task_status;
pub mod user;

pub use label::*;
pub use task::*;
pub use task_status::*;
pub use user::*;
