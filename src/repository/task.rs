//! Task repository

use crate::domain::{NewTask, Task, TaskCriteria, TASK_MISSING_REFERENCE};
use crate::error::{map_reference_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn create(&self, input: &NewTask) -> Result<Task>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>>;
    async fn list(&self, criteria: &TaskCriteria, offset: i64, limit: i64) -> Result<Vec<Task>>;
    async fn count(&self, criteria: &TaskCriteria) -> Result<i64>;
    async fn update(&self, task: &Task) -> Result<Task>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn exists_by_status(&self, status_id: i64) -> Result<bool>;
    async fn exists_by_assignee(&self, user_id: i64) -> Result<bool>;
    async fn exists_by_label(&self, label_id: i64) -> Result<bool>;
}

const SELECT_TASKS: &str = r#"
    SELECT t.id, t.name, t."index", t.description, t.task_status_id, t.assignee_id,
           COALESCE(
               ARRAY_AGG(tl.label_id ORDER BY tl.label_id) FILTER (WHERE tl.label_id IS NOT NULL),
               '{}'
           ) AS label_ids,
           t.created_at
    FROM tasks t
    LEFT JOIN task_labels tl ON tl.task_id = t.id
"#;

pub struct TaskRepositoryImpl {
    pool: PgPool,
}

impl TaskRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters and wrap the needle for a substring match.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_criteria(builder: &mut QueryBuilder<'_, Postgres>, criteria: &TaskCriteria) {
    builder.push(" WHERE TRUE");
    if let Some(title) = &criteria.title_cont {
        builder
            .push(" AND t.name ILIKE ")
            .push_bind(like_pattern(title));
    }
    if let Some(assignee_id) = criteria.assignee_id {
        builder.push(" AND t.assignee_id = ").push_bind(assignee_id);
    }
    if let Some(status_id) = criteria.status_id {
        builder.push(" AND t.task_status_id = ").push_bind(status_id);
    }
    if let Some(label_id) = criteria.label_id {
        builder
            .push(" AND EXISTS (SELECT 1 FROM task_labels f WHERE f.task_id = t.id AND f.label_id = ")
            .push_bind(label_id)
            .push(")");
    }
}

async fn replace_labels(
    tx: &mut Transaction<'_, Postgres>,
    task_id: i64,
    label_ids: &[i64],
) -> Result<()> {
    sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    if !label_ids.is_empty() {
        sqlx::query(
            "INSERT INTO task_labels (task_id, label_id) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(task_id)
        .bind(label_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_reference_violation(e, TASK_MISSING_REFERENCE))?;
    }

    Ok(())
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, input: &NewTask) -> Result<Task> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (name, "index", description, task_status_id, assignee_id, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.index)
        .bind(&input.description)
        .bind(input.task_status_id)
        .bind(input.assignee_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_reference_violation(e, TASK_MISSING_REFERENCE))?;

        replace_labels(&mut tx, id, &input.label_ids).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create task")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_TASKS);
        builder
            .push(" WHERE t.id = ")
            .push_bind(id)
            .push(" GROUP BY t.id");

        let task = builder
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(task)
    }

    async fn list(&self, criteria: &TaskCriteria, offset: i64, limit: i64) -> Result<Vec<Task>> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_TASKS);
        push_criteria(&mut builder, criteria);
        builder
            .push(" GROUP BY t.id ORDER BY t.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn count(&self, criteria: &TaskCriteria) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks t");
        push_criteria(&mut builder, criteria);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET name = $1, "index" = $2, description = $3, task_status_id = $4, assignee_id = $5
            WHERE id = $6
            "#,
        )
        .bind(&task.name)
        .bind(task.index)
        .bind(&task.description)
        .bind(task.task_status_id)
        .bind(task.assignee_id)
        .bind(task.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_reference_violation(e, TASK_MISSING_REFERENCE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", task.id)));
        }

        replace_labels(&mut tx, task.id, &task.label_ids).await?;
        tx.commit().await?;

        self.find_by_id(task.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update task")))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }

        Ok(())
    }

    async fn exists_by_status(&self, status_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE task_status_id = $1)")
                .bind(status_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_assignee(&self, user_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE assignee_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn exists_by_label(&self, label_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM task_labels WHERE label_id = $1)")
                .bind(label_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
