//! Greeting and error-reporting smoke endpoints

use crate::error::AppError;
use crate::middleware::auth::OptionalAuth;

/// Plain-text greeting
#[utoipa::path(
    get,
    path = "/welcome",
    tag = "System",
    security((), ("bearer_jwt" = [])),
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    )
)]
pub async fn welcome(OptionalAuth(auth): OptionalAuth) -> String {
    match auth {
        Some(user) => format!("Welcome to Task Manager, {}!", user.email),
        None => "Welcome to Task Manager!".to_string(),
    }
}

/// Report a synthetic error to Sentry
///
/// Lets operators confirm the DSN is wired up. Without a configured DSN the
/// capture is a no-op.
#[utoipa::path(
    get,
    path = "/error-test",
    tag = "System",
    security(()),
    responses(
        (status = 200, description = "Error captured", body = String, content_type = "text/plain")
    )
)]
pub async fn error_test() -> String {
    let error = AppError::Internal(anyhow::anyhow!("Test error for Sentry"));
    let event_id = sentry::capture_error(&error);
    tracing::info!(%event_id, "Reported test error");
    "An error occurred and was reported to Sentry".to_string()
}
