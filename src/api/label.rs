//! Label API handlers

use crate::api::counted_all;
use crate::domain::{CreateLabelInput, Label, UpdateLabelInput};
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
    path = "/api/labels",
    tag = "Labels",
    responses(
        (status = 200, description = "All labels", body = Vec<Label>,
            headers(("X-Total-Count" = i64, description = "Number of labels")))
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
) -> Result<impl IntoResponse> {
    let labels = state.label_service().list().await?;
    Ok(counted_all(labels))
}

#[utoipa::path(
    get,
    path = "/api/labels/{id}",
    tag = "Labels",
    params(("id" = i64, Path, description = "Label ID")),
    responses(
        (status = 200, description = "Success", body = Label),
        (status = 404, description = "Label not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Label>> {
    Ok(Json(state.label_service().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/labels",
    tag = "Labels",
    request_body = CreateLabelInput,
    responses(
        (status = 201, description = "Created", body = Label),
        (status = 409, description = "Label already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Json(input): Json<CreateLabelInput>,
) -> Result<impl IntoResponse> {
    let label = state.label_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(label)))
}

#[utoipa::path(
    put,
    path = "/api/labels/{id}",
    tag = "Labels",
    params(("id" = i64, Path, description = "Label ID")),
    request_body = UpdateLabelInput,
    responses(
        (status = 200, description = "Updated", body = Label),
        (status = 404, description = "Label not found"),
        (status = 409, description = "Label already exists")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateLabelInput>,
) -> Result<Json<Label>> {
    Ok(Json(state.label_service().update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/api/labels/{id}",
    tag = "Labels",
    params(("id" = i64, Path, description = "Label ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Label is used by tasks"),
        (status = 404, description = "Label not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.label_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
