//! User API handlers

use crate::api::counted_all;
use crate::domain::{CreateUserInput, UpdateUserInput, User};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<User>,
            headers(("X-Total-Count" = i64, description = "Number of users")))
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
) -> Result<impl IntoResponse> {
    let users = state.user_service().list().await?;
    Ok(counted_all(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Success", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    Ok(Json(state.user_service().get(id).await?))
}

/// Create user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 409, description = "Email already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    _auth: AuthUser,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update user. Only the account owner or an administrator may do this.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserInput,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<User>> {
    let user = state
        .user_service()
        .update(id, input, auth.caller())
        .await?;
    Ok(Json(user))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "User is assigned to tasks"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.user_service().delete(id, auth.caller()).await?;
    Ok(StatusCode::NO_CONTENT)
}
