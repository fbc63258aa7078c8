//! Task Manager - task tracking backend
//!
//! REST API for users, task statuses, labels and tasks, backed by
//! PostgreSQL or an in-memory store, with self-issued JWT auth.

pub mod api;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
