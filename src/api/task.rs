//! Task API handlers

use crate::api::{counted, TaskListQuery};
use crate::domain::{CreateTaskInput, TaskDto, UpdateTaskInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List tasks
///
/// All filters combine with AND. `X-Total-Count` holds the number of
/// matching tasks, not the size of the returned page.
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "One page of tasks", body = Vec<TaskDto>,
            headers(("X-Total-Count" = i64, description = "Number of matching tasks")))
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .task_service()
        .list(query.filter(), query.page, query.per_page)
        .await?;
    Ok(counted(page.total, page.tasks))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Success", body = TaskDto),
        (status = 404, description = "Task not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>> {
    Ok(Json(state.task_service().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskInput,
    responses(
        (status = 201, description = "Created", body = TaskDto),
        (status = 404, description = "Referenced status, assignee or label not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Json(input): Json<CreateTaskInput>,
) -> Result<impl IntoResponse> {
    let task = state.task_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = UpdateTaskInput,
    responses(
        (status = 200, description = "Updated", body = TaskDto),
        (status = 404, description = "Task or referenced entity not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskInput>,
) -> Result<Json<TaskDto>> {
    Ok(Json(state.task_service().update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.task_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
