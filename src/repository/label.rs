//! Label repository

use crate::domain::{Label, LABEL_IN_USE};
use crate::error::{map_reference_violation, map_unique_violation, AppError, Result};
use async_trait::async_trait;
use sqlx::PgPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelRepository: Send + Sync + 'static {
    async fn create(&self, name: &str) -> Result<Label>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Label>>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Label>>;
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Label>>;
    async fn list(&self) -> Result<Vec<Label>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, label: &Label) -> Result<Label>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct LabelRepositoryImpl {
    pool: PgPool,
}

impl LabelRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabelRepository for LabelRepositoryImpl {
    async fn create(&self, name: &str) -> Result<Label> {
        sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (name, created_at)
            VALUES ($1, NOW())
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Label"))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Label>> {
        let label = sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(label)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Label>> {
        let label =
            sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(label)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Label>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let labels = sqlx::query_as::<_, Label>(
            "SELECT id, name, created_at FROM labels WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(labels)
    }

    async fn list(&self) -> Result<Vec<Label>> {
        let labels = sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(labels)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM labels")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, label: &Label) -> Result<Label> {
        sqlx::query_as::<_, Label>(
            r#"
            UPDATE labels
            SET name = $1
            WHERE id = $2
            RETURNING id, name, created_at
            "#,
        )
        .bind(&label.name)
        .bind(label.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Label"))?
        .ok_or_else(|| AppError::NotFound(format!("Label {} not found", label.id)))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_reference_violation(e, LABEL_IN_USE))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Label {} not found", id)));
        }

        Ok(())
    }
}
