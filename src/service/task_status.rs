//! Task status business logic

use crate::domain::{
    CreateTaskStatusInput, TaskStatus, UpdateTaskStatusInput, DEFAULT_TASK_STATUSES,
    STATUS_IN_USE,
};
use crate::error::{AppError, Result};
use crate::repository::{TaskRepository, TaskStatusRepository};
use std::sync::Arc;
use validator::Validate;

pub struct TaskStatusService<S: TaskStatusRepository, T: TaskRepository> {
    repo: Arc<S>,
    task_repo: Arc<T>,
}

impl<S: TaskStatusRepository, T: TaskRepository> TaskStatusService<S, T> {
    pub fn new(repo: Arc<S>, task_repo: Arc<T>) -> Self {
        Self { repo, task_repo }
    }

    pub async fn list(&self) -> Result<Vec<TaskStatus>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<TaskStatus> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task status {} not found", id)))
    }

    pub async fn create(&self, input: CreateTaskStatusInput) -> Result<TaskStatus> {
        input.validate()?;
        self.ensure_unique(None, &input.name, &input.slug).await?;
        self.repo.create(&input.name, &input.slug).await
    }

    pub async fn update(&self, id: i64, input: UpdateTaskStatusInput) -> Result<TaskStatus> {
        input.validate()?;

        let mut status = self.get(id).await?;
        if let Some(name) = input.name {
            status.name = name;
        }
        if let Some(slug) = input.slug {
            status.slug = slug;
        }
        self.ensure_unique(Some(id), &status.name, &status.slug)
            .await?;

        self.repo.update(&status).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;

        if self.task_repo.exists_by_status(id).await? {
            return Err(AppError::BadRequest(STATUS_IN_USE.to_string()));
        }

        self.repo.delete(id).await
    }

    /// Insert the default workflow statuses that are missing (matched by slug).
    /// Returns the number of statuses created.
    pub async fn ensure_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for (name, slug) in DEFAULT_TASK_STATUSES {
            if self.repo.find_by_slug(slug).await?.is_none() {
                self.repo.create(name, slug).await?;
                created += 1;
            }
        }
        Ok(created)
    }

    async fn ensure_unique(&self, id: Option<i64>, name: &str, slug: &str) -> Result<()> {
        let is_other = |status: &TaskStatus| Some(status.id) != id;

        if let Some(existing) = self.repo.find_by_slug(slug).await? {
            if is_other(&existing) {
                return Err(AppError::Conflict(format!(
                    "Task status with slug '{}' already exists",
                    slug
                )));
            }
        }
        if let Some(existing) = self.repo.find_by_name(name).await? {
            if is_other(&existing) {
                return Err(AppError::Conflict(format!(
                    "Task status with name '{}' already exists",
                    name
                )));
            }
        }
        Ok(())
    }
}
