//! Task status API handlers. Reads are public.

use crate::api::counted_all;
use crate::domain::{CreateTaskStatusInput, TaskStatus, UpdateTaskStatusInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/task_statuses",
    tag = "Task Statuses",
    security(()),
    responses(
        (status = 200, description = "All task statuses", body = Vec<TaskStatus>,
            headers(("X-Total-Count" = i64, description = "Number of statuses")))
    )
)]
pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let statuses = state.task_status_service().list().await?;
    Ok(counted_all(statuses))
}

#[utoipa::path(
    get,
    path = "/api/task_statuses/{id}",
    tag = "Task Statuses",
    security(()),
    params(("id" = i64, Path, description = "Task status ID")),
    responses(
        (status = 200, description = "Success", body = TaskStatus),
        (status = 404, description = "Task status not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<i64>,
) -> Result<Json<TaskStatus>> {
    Ok(Json(state.task_status_service().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/task_statuses",
    tag = "Task Statuses",
    request_body = CreateTaskStatusInput,
    responses(
        (status = 201, description = "Created", body = TaskStatus),
        (status = 409, description = "Name or slug already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Json(input): Json<CreateTaskStatusInput>,
) -> Result<impl IntoResponse> {
    let status = state.task_status_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

#[utoipa::path(
    put,
    path = "/api/task_statuses/{id}",
    tag = "Task Statuses",
    params(("id" = i64, Path, description = "Task status ID")),
    request_body = UpdateTaskStatusInput,
    responses(
        (status = 200, description = "Updated", body = TaskStatus),
        (status = 404, description = "Task status not found"),
        (status = 409, description = "Name or slug already taken")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskStatusInput>,
) -> Result<Json<TaskStatus>> {
    Ok(Json(state.task_status_service().update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/task_statuses/{id}",
    tag = "Task Statuses",
    params(("id" = i64, Path, description = "Task status ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Status is used by tasks"),
        (status = 404, description = "Task status not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.task_status_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
