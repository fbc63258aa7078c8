//! OpenAPI 3 documentation assembly
//!
//! Aggregates the handler path annotations and DTO schemas into a single
//! document. Served as JSON at `/v3/api-docs`, with Swagger UI at
//! `/swagger-ui` and ReDoc at `/redoc`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Manager API",
        description = "Users, task statuses, labels and tasks",
        license(name = "MIT")
    ),
    tags(
        (name = "System", description = "Health checks and smoke endpoints"),
        (name = "Auth", description = "Token issuing"),
        (name = "Users", description = "User accounts"),
        (name = "Task Statuses", description = "Workflow states a task moves through"),
        (name = "Labels", description = "Task labels"),
        (name = "Tasks", description = "Tasks with filtering and pagination"),
    ),
    security(
        ("bearer_jwt" = [])
    ),
    components(
        schemas(
            crate::api::TaskListQuery,
            crate::api::health::HealthResponse,

            crate::domain::User,
            crate::domain::CreateUserInput,
            crate::domain::UpdateUserInput,
            crate::domain::LoginInput,

            crate::domain::TaskStatus,
            crate::domain::CreateTaskStatusInput,
            crate::domain::UpdateTaskStatusInput,

            crate::domain::Label,
            crate::domain::CreateLabelInput,
            crate::domain::UpdateLabelInput,

            crate::domain::TaskDto,
            crate::domain::CreateTaskInput,
            crate::domain::UpdateTaskInput,
        ),
    ),
    paths(
        // ── System ─────────────────────────────────────────────────
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::misc::welcome,
        crate::api::misc::error_test,

        // ── Auth ───────────────────────────────────────────────────
        crate::api::auth::login,

        // ── Users ──────────────────────────────────────────────────
        crate::api::user::list,
        crate::api::user::get,
        crate::api::user::create,
        crate::api::user::update,
        crate::api::user::delete,

        // ── Task Statuses ──────────────────────────────────────────
        crate::api::task_status::list,
        crate::api::task_status::get,
        crate::api::task_status::create,
        crate::api::task_status::update,
        crate::api::task_status::delete,

        // ── Labels ─────────────────────────────────────────────────
        crate::api::label::list,
        crate::api::label::get,
        crate::api::label::create,
        crate::api::label::update,
        crate::api::label::delete,

        // ── Tasks ──────────────────────────────────────────────────
        crate::api::task::list,
        crate::api::task::get,
        crate::api::task::create,
        crate::api::task::update,
        crate::api::task::delete,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The document with the `bearer_jwt` security scheme registered
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
        doc
    }
}
