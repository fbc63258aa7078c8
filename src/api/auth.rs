//! Login endpoint

use crate::domain::LoginInput;
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};

/// Exchange credentials for an access token
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginInput,
    security(()),
    responses(
        (status = 200, description = "Signed JWT", body = String, content_type = "text/plain"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<impl IntoResponse> {
    let token = state.auth_service().login(input).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], token))
}
