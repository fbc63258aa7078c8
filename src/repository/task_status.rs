//! Task status repository

use crate::domain::{TaskStatus, STATUS_IN_USE};
use crate::error::{map_reference_violation, map_unique_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::PgPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStatusRepository: Send + Sync + 'static {
    async fn create(&self, name: &str, slug: &str) -> Result<TaskStatus>;
    async fn find_by_id(&self, id: i64) -> Result<Option<TaskStatus>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<TaskStatus>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<TaskStatus>>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TaskStatus>>;
    async fn list(&self) -> Result<Vec<TaskStatus>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, status: &TaskStatus) -> Result<TaskStatus>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct TaskStatusRepositoryImpl {
    pool: PgPool,
}

impl TaskStatusRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStatusRepository for TaskStatusRepositoryImpl {
    async fn create(&self, name: &str, slug: &str) -> Result<TaskStatus> {
        sqlx::query_as::<_, TaskStatus>(
            r#"
            INSERT INTO task_statuses (name, slug, created_at)
            VALUES ($1, $2, NOW())
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Task status"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TaskStatus>> {
        let status = sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<TaskStatus>> {
        let status = sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<TaskStatus>> {
        let status = sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TaskStatus>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statuses = sqlx::query_as::<_, TaskStatus>(
            r#"
            SELECT id, name, slug, created_at
            FROM task_statuses
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    async fn list(&self) -> Result<Vec<TaskStatus>> {
        let statuses = sqlx::query_as::<_, TaskStatus>(
            "SELECT id, name, slug, created_at FROM task_statuses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_statuses")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, status: &TaskStatus) -> Result<TaskStatus> {
        sqlx::query_as::<_, TaskStatus>(
            r#"
            UPDATE task_statuses
            SET name = $1, slug = $2
            WHERE id = $3
            RETURNING id, name, slug, created_at
            "#,
        )
        .bind(&status.name)
        .bind(&status.slug)
        .bind(status.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Task status"))?
        .ok_or_else(|| AppError::NotFound(format!("Task status {} not found", status.id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM task_statuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_reference_violation(e, STATUS_IN_USE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task status {} not found", id)));
        }

        Ok(())
    }
}
