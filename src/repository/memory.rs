//! Embedded in-memory store
//!
//! Used when no `DATABASE_URL` is configured (local runs and tests).
//! Mirrors the Postgres repositories: sequential ids from 1, the same
//! uniqueness rules, and `NotFound` on updates/deletes of missing rows.
//!
//! Repositories built over one [`MemoryStore`] also enforce the schema's
//! foreign keys. The `tasks` lock is always taken before any other table.

use super::{LabelRepository, TaskRepository, TaskStatusRepository, UserRepository};
use crate::domain::{
    Label, NewTask, NewUser, Task, TaskCriteria, TaskStatus, User, LABEL_IN_USE, STATUS_IN_USE,
    TASK_MISSING_REFERENCE, USER_ASSIGNED,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

struct Table<T> {
    rows: Vec<T>,
    last_id: i64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: vec![],
            last_id: 0,
        }
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tables shared by the in-memory repositories
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Table<User>>,
    statuses: RwLock<Table<TaskStatus>>,
    labels: RwLock<Table<Label>>,
    tasks: RwLock<Table<Task>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Callers must already hold the `tasks` lock.
    async fn check_task_references(
        &self,
        status_id: i64,
        assignee_id: Option<i64>,
        label_ids: &[i64],
    ) -> Result<()> {
        let status_ok = self.statuses.read().await.rows.iter().any(|s| s.id == status_id);
        let assignee_ok = match assignee_id {
            Some(user_id) => self.users.read().await.rows.iter().any(|u| u.id == user_id),
            None => true,
        };
        let labels = self.labels.read().await;
        let labels_ok = label_ids
            .iter()
            .all(|id| labels.rows.iter().any(|l| l.id == *id));

        if status_ok && assignee_ok && labels_ok {
            Ok(())
        } else {
            Err(AppError::BadRequest(TASK_MISSING_REFERENCE.to_string()))
        }
    }
}

// ============================================================
// Users
// ============================================================

pub struct InMemoryUserRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryUserRepository {
    /// Repository over its own private store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: &NewUser) -> Result<User> {
        let mut table = self.store.users.write().await;
        if table.rows.iter().any(|u| u.email == input.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        let user = User {
            id: table.next_id(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            password_hash: input.password_hash.clone(),
            roles: input.roles.clone(),
            created_at: Utc::now(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let table = self.store.users.read().await;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.store.users.read().await;
        Ok(table.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.store.users.read().await.rows.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.store.users.read().await.rows.len() as i64)
    }

    async fn update(&self, user: &User) -> Result<User> {
        let mut table = self.store.users.write().await;
        if table
            .rows
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        let slot = table
            .rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;
        *slot = User {
            created_at: slot.created_at,
            ..user.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let tasks = self.store.tasks.read().await;
        if tasks.rows.iter().any(|t| t.assignee_id == Some(id)) {
            return Err(AppError::BadRequest(USER_ASSIGNED.to_string()));
        }
        let mut table = self.store.users.write().await;
        let before = table.rows.len();
        table.rows.retain(|u| u.id != id);
        if table.rows.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================
// Task statuses
// ============================================================

pub struct InMemoryTaskStatusRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryTaskStatusRepository {
    /// Repository over its own private store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryTaskStatusRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn status_clash(rows: &[TaskStatus], id: i64, name: &str, slug: &str) -> bool {
    rows.iter()
        .any(|s| s.id != id && (s.name == name || s.slug == slug))
}

#[async_trait]
impl TaskStatusRepository for InMemoryTaskStatusRepository {
    async fn create(&self, name: &str, slug: &str) -> Result<TaskStatus> {
        let mut table = self.store.statuses.write().await;
        if status_clash(&table.rows, 0, name, slug) {
            return Err(AppError::Conflict("Task status already exists".to_string()));
        }
        let status = TaskStatus {
            id: table.next_id(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now(),
        };
        table.rows.push(status.clone());
        Ok(status)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TaskStatus>> {
        let table = self.store.statuses.read().await;
        Ok(table.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<TaskStatus>> {
        let table = self.store.statuses.read().await;
        Ok(table.rows.iter().find(|s| s.slug == slug).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<TaskStatus>> {
        let table = self.store.statuses.read().await;
        Ok(table.rows.iter().find(|s| s.name == name).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<TaskStatus>> {
        let table = self.store.statuses.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<TaskStatus>> {
        Ok(self.store.statuses.read().await.rows.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.store.statuses.read().await.rows.len() as i64)
    }

    async fn update(&self, status: &TaskStatus) -> Result<TaskStatus> {
        let mut table = self.store.statuses.write().await;
        if status_clash(&table.rows, status.id, &status.name, &status.slug) {
            return Err(AppError::Conflict("Task status already exists".to_string()));
        }
        let slot = table
            .rows
            .iter_mut()
            .find(|s| s.id == status.id)
            .ok_or_else(|| AppError::NotFound(format!("Task status {} not found", status.id)))?;
        slot.name = status.name.clone();
        slot.slug = status.slug.clone();
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let tasks = self.store.tasks.read().await;
        if tasks.rows.iter().any(|t| t.task_status_id == id) {
            return Err(AppError::BadRequest(STATUS_IN_USE.to_string()));
        }
        let mut table = self.store.statuses.write().await;
        let before = table.rows.len();
        table.rows.retain(|s| s.id != id);
        if table.rows.len() == before {
            return Err(AppError::NotFound(format!("Task status {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================
// Labels
// ============================================================

pub struct InMemoryLabelRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryLabelRepository {
    /// Repository over its own private store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryLabelRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LabelRepository for InMemoryLabelRepository {
    async fn create(&self, name: &str) -> Result<Label> {
        let mut table = self.store.labels.write().await;
        if table.rows.iter().any(|l| l.name == name) {
            return Err(AppError::Conflict("Label already exists".to_string()));
        }
        let label = Label {
            id: table.next_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        table.rows.push(label.clone());
        Ok(label)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Label>> {
        let table = self.store.labels.read().await;
        Ok(table.rows.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Label>> {
        let table = self.store.labels.read().await;
        Ok(table.rows.iter().find(|l| l.name == name).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Label>> {
        let table = self.store.labels.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Label>> {
        Ok(self.store.labels.read().await.rows.clone())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.store.labels.read().await.rows.len() as i64)
    }

    async fn update(&self, label: &Label) -> Result<Label> {
        let mut table = self.store.labels.write().await;
        if table
            .rows
            .iter()
            .any(|l| l.id != label.id && l.name == label.name)
        {
            return Err(AppError::Conflict("Label already exists".to_string()));
        }
        let slot = table
            .rows
            .iter_mut()
            .find(|l| l.id == label.id)
            .ok_or_else(|| AppError::NotFound(format!("Label {} not found", label.id)))?;
        slot.name = label.name.clone();
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let tasks = self.store.tasks.read().await;
        if tasks.rows.iter().any(|t| t.label_ids.contains(&id)) {
            return Err(AppError::BadRequest(LABEL_IN_USE.to_string()));
        }
        let mut table = self.store.labels.write().await;
        let before = table.rows.len();
        table.rows.retain(|l| l.id != id);
        if table.rows.len() == before {
            return Err(AppError::NotFound(format!("Label {} not found", id)));
        }
        Ok(())
    }
}

// ============================================================
// Tasks
// ============================================================

pub struct InMemoryTaskRepository {
    store: Arc<MemoryStore>,
}

impl InMemoryTaskRepository {
    /// Repository over its own private store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized_labels(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: &NewTask) -> Result<Task> {
        let mut table = self.store.tasks.write().await;
        self.store
            .check_task_references(input.task_status_id, input.assignee_id, &input.label_ids)
            .await?;
        let task = Task {
            id: table.next_id(),
            name: input.name.clone(),
            index: input.index,
            description: input.description.clone(),
            task_status_id: input.task_status_id,
            assignee_id: input.assignee_id,
            label_ids: normalized_labels(&input.label_ids),
            created_at: Utc::now(),
        };
        table.rows.push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let table = self.store.tasks.read().await;
        Ok(table.rows.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, criteria: &TaskCriteria, offset: i64, limit: i64) -> Result<Vec<Task>> {
        let table = self.store.tasks.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|t| criteria.matches(t))
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, criteria: &TaskCriteria) -> Result<i64> {
        let table = self.store.tasks.read().await;
        Ok(table.rows.iter().filter(|t| criteria.matches(t)).count() as i64)
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        let mut table = self.store.tasks.write().await;
        self.store
            .check_task_references(task.task_status_id, task.assignee_id, &task.label_ids)
            .await?;
        let slot = table
            .rows
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))?;
        *slot = Task {
            label_ids: normalized_labels(&task.label_ids),
            created_at: slot.created_at,
            ..task.clone()
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.store.tasks.write().await;
        let before = table.rows.len();
        table.rows.retain(|t| t.id != id);
        if table.rows.len() == before {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }

    async fn exists_by_status(&self, status_id: i64) -> Result<bool> {
        let table = self.store.tasks.read().await;
        Ok(table.rows.iter().any(|t| t.task_status_id == status_id))
    }

    async fn exists_by_assignee(&self, user_id: i64) -> Result<bool> {
        let table = self.store.tasks.read().await;
        Ok(table.rows.iter().any(|t| t.assignee_id == Some(user_id)))
    }

    async fn exists_by_label(&self, label_id: i64) -> Result<bool> {
        let table = self.store.tasks.read().await;
        Ok(table.rows.iter().any(|t| t.label_ids.contains(&label_id)))
    }
}
