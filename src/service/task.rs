//! Task business logic

use crate::domain::{
    CreateTaskInput, NewTask, Task, TaskCriteria, TaskDto, TaskFilter, TaskStatus, UpdateTaskInput,
};
use crate::error::{AppError, Result};
use crate::repository::{LabelRepository, TaskRepository, TaskStatusRepository, UserRepository};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

/// Repository bundle for TaskService
pub struct TaskRepositoryBundle<
    T: TaskRepository,
    S: TaskStatusRepository,
    U: UserRepository,
    L: LabelRepository,
> {
    pub task: Arc<T>,
    pub status: Arc<S>,
    pub user: Arc<U>,
    pub label: Arc<L>,
}

pub struct TaskService<T: TaskRepository, S: TaskStatusRepository, U: UserRepository, L: LabelRepository>
{
    repo: Arc<T>,
    status_repo: Arc<S>,
    user_repo: Arc<U>,
    label_repo: Arc<L>,
}

/// One page of tasks plus the number of tasks matching the filter
#[derive(Debug, Clone)]
pub struct TaskPage {
    pub tasks: Vec<TaskDto>,
    pub total: i64,
}

impl<T, S, U, L> TaskService<T, S, U, L>
where
    T: TaskRepository,
    S: TaskStatusRepository,
    U: UserRepository,
    L: LabelRepository,
{
    pub fn new(repos: TaskRepositoryBundle<T, S, U, L>) -> Self {
        Self {
            repo: repos.task,
            status_repo: repos.status,
            user_repo: repos.user,
            label_repo: repos.label,
        }
    }

    pub async fn list(&self, filter: TaskFilter, page: i64, per_page: i64) -> Result<TaskPage> {
        let status_id = match &filter.status {
            Some(slug) => match self.status_repo.find_by_slug(slug).await? {
                Some(status) => Some(status.id),
                None => {
                    return Ok(TaskPage {
                        tasks: vec![],
                        total: 0,
                    })
                }
            },
            None => None,
        };

        let criteria = TaskCriteria {
            title_cont: filter.title_cont.filter(|t| !t.is_empty()),
            assignee_id: filter.assignee_id,
            status_id,
            label_id: filter.label_id,
        };

        let total = self.repo.count(&criteria).await?;
        // A page past i64 range is necessarily past the last row
        let Some(offset) = (page.max(1) - 1).checked_mul(per_page) else {
            return Ok(TaskPage {
                tasks: vec![],
                total,
            });
        };
        let tasks = self.repo.list(&criteria, offset, per_page).await?;

        let mut status_ids: Vec<i64> = tasks.iter().map(|t| t.task_status_id).collect();
        status_ids.sort_unstable();
        status_ids.dedup();
        let statuses: HashMap<i64, TaskStatus> = self
            .status_repo
            .find_by_ids(&status_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let tasks = tasks
            .into_iter()
            .map(|task| {
                let status = statuses.get(&task.task_status_id).ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "Task {} references missing status {}",
                        task.id,
                        task.task_status_id
                    ))
                })?;
                Ok(TaskDto::from_task(task, status))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TaskPage { tasks, total })
    }

    pub async fn get(&self, id: i64) -> Result<TaskDto> {
        let task = self.find(id).await?;
        self.to_dto(task).await
    }

    pub async fn create(&self, input: CreateTaskInput) -> Result<TaskDto> {
        input.validate()?;

        let status = self.resolve_status(&input.status).await?;
        if let Some(assignee_id) = input.assignee_id {
            self.ensure_assignee(assignee_id).await?;
        }
        let label_ids = self.resolve_labels(&input.task_label_ids).await?;

        let task = self
            .repo
            .create(&NewTask {
                name: input.title,
                index: input.index,
                description: input.content,
                task_status_id: status.id,
                assignee_id: input.assignee_id,
                label_ids,
            })
            .await?;

        tracing::info!(task_id = task.id, status = %status.slug, "Task created");
        Ok(TaskDto::from_task(task, &status))
    }

    pub async fn update(&self, id: i64, input: UpdateTaskInput) -> Result<TaskDto> {
        input.validate()?;

        let mut task = self.find(id).await?;

        if let Some(title) = input.title {
            task.name = title;
        }
        if let Some(content) = input.content {
            task.description = content;
        }
        if let Some(index) = input.index {
            task.index = index;
        }
        if let Some(assignee_id) = input.assignee_id {
            if let Some(user_id) = assignee_id {
                self.ensure_assignee(user_id).await?;
            }
            task.assignee_id = assignee_id;
        }
        if let Some(slug) = &input.status {
            task.task_status_id = self.resolve_status(slug).await?.id;
        }
        if let Some(label_ids) = &input.task_label_ids {
            task.label_ids = self.resolve_labels(label_ids).await?;
        }

        let task = self.repo.update(&task).await?;
        self.to_dto(task).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.find(id).await?;
        self.repo.delete(id).await?;
        tracing::info!(task_id = id, "Task deleted");
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Task> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    async fn to_dto(&self, task: Task) -> Result<TaskDto> {
        let status = self
            .status_repo
            .find_by_id(task.task_status_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "Task {} references missing status {}",
                    task.id,
                    task.task_status_id
                ))
            })?;
        Ok(TaskDto::from_task(task, &status))
    }

    async fn resolve_status(&self, slug: &str) -> Result<TaskStatus> {
        self.status_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task status not found: {}", slug)))
    }

    async fn ensure_assignee(&self, user_id: i64) -> Result<()> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))
    }

    /// Deduplicate and check that every label exists.
    async fn resolve_labels(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(ids);
        }

        let found: Vec<i64> = self
            .label_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!(
                "Labels not found: {}",
                missing.join(", ")
            )));
        }
        Ok(ids)
    }
}
