//! Label business logic

use crate::domain::{CreateLabelInput, Label, UpdateLabelInput, DEFAULT_LABELS, LABEL_IN_USE};
use crate::error::{AppError, Result};
use crate::repository::{LabelRepository, TaskRepository};
use std::sync::Arc;
use validator::Validate;

pub struct LabelService<L: LabelRepository, T: TaskRepository> {
    repo: Arc<L>,
    task_repo: Arc<T>,
}

impl<L: LabelRepository, T: TaskRepository> LabelService<L, T> {
    pub fn new(repo: Arc<L>, task_repo: Arc<T>) -> Self {
        Self { repo, task_repo }
    }

    pub async fn list(&self) -> Result<Vec<Label>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Label> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Label {} not found", id)))
    }

    pub async fn create(&self, input: CreateLabelInput) -> Result<Label> {
        input.validate()?;

        if self.repo.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Label '{}' already exists",
                input.name
            )));
        }

        self.repo.create(&input.name).await
    }

    pub async fn update(&self, id: i64, input: UpdateLabelInput) -> Result<Label> {
        input.validate()?;

        let mut label = self.get(id).await?;
        if let Some(name) = input.name {
            if name != label.name {
                if self.repo.find_by_name(&name).await?.is_some() {
                    return Err(AppError::Conflict(format!("Label '{}' already exists", name)));
                }
                label.name = name;
            }
        }

        self.repo.update(&label).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get(id).await?;

        if self.task_repo.exists_by_label(id).await? {
            return Err(AppError::BadRequest(LABEL_IN_USE.to_string()));
        }

        self.repo.delete(id).await
    }

    pub async fn ensure_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for name in DEFAULT_LABELS {
            if self.repo.find_by_name(name).await?.is_none() {
                self.repo.create(name).await?;
                created += 1;
            }
        }
        Ok(created)
    }
}
