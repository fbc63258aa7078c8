//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{
    normalize_error_response, security_headers_middleware, ObservabilityLayer, SanitizedMakeSpan,
};
use crate::migration;
use crate::openapi::ApiDoc;
use crate::repository::{
    InMemoryLabelRepository, InMemoryTaskRepository, InMemoryTaskStatusRepository,
    InMemoryUserRepository, LabelRepository, LabelRepositoryImpl, MemoryStore, TaskRepository,
    TaskRepositoryImpl, TaskStatusRepository, TaskStatusRepositoryImpl, UserRepository,
    UserRepositoryImpl,
};
use crate::service::{
    AuthService, LabelService, TaskRepositoryBundle, TaskService, TaskStatusService, UserService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers, generic over the repository set
pub struct AppState<U, S, L, T>
where
    U: UserRepository,
    S: TaskStatusRepository,
    L: LabelRepository,
    T: TaskRepository,
{
    pub config: Arc<Config>,
    /// Present when backed by PostgreSQL; used by the readiness probe
    pub db_pool: Option<PgPool>,
    pub jwt_manager: Arc<JwtManager>,
    pub auth_service: Arc<AuthService<U>>,
    pub user_service: Arc<UserService<U, T>>,
    pub task_status_service: Arc<TaskStatusService<S, T>>,
    pub label_service: Arc<LabelService<L, T>>,
    pub task_service: Arc<TaskService<T, S, U, L>>,
}

/// Production state over PostgreSQL
pub type PgAppState =
    AppState<UserRepositoryImpl, TaskStatusRepositoryImpl, LabelRepositoryImpl, TaskRepositoryImpl>;

/// Embedded state for local runs and tests
pub type MemoryAppState = AppState<
    InMemoryUserRepository,
    InMemoryTaskStatusRepository,
    InMemoryLabelRepository,
    InMemoryTaskRepository,
>;

impl<U, S, L, T> Clone for AppState<U, S, L, T>
where
    U: UserRepository,
    S: TaskStatusRepository,
    L: LabelRepository,
    T: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db_pool: self.db_pool.clone(),
            jwt_manager: self.jwt_manager.clone(),
            auth_service: self.auth_service.clone(),
            user_service: self.user_service.clone(),
            task_status_service: self.task_status_service.clone(),
            label_service: self.label_service.clone(),
            task_service: self.task_service.clone(),
        }
    }
}

impl<U, S, L, T> AppState<U, S, L, T>
where
    U: UserRepository,
    S: TaskStatusRepository,
    L: LabelRepository,
    T: TaskRepository,
{
    /// Wire the services over an existing set of repositories
    pub fn from_repositories(
        config: Config,
        repos: TaskRepositoryBundle<T, S, U, L>,
        db_pool: Option<PgPool>,
    ) -> Result<Self> {
        let jwt_manager = Arc::new(JwtManager::new(config.jwt.clone())?);

        let auth_service = Arc::new(AuthService::new(repos.user.clone(), jwt_manager.clone()));
        let user_service = Arc::new(UserService::new(repos.user.clone(), repos.task.clone()));
        let task_status_service = Arc::new(TaskStatusService::new(
            repos.status.clone(),
            repos.task.clone(),
        ));
        let label_service = Arc::new(LabelService::new(repos.label.clone(), repos.task.clone()));
        let task_service = Arc::new(TaskService::new(repos));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_manager,
            auth_service,
            user_service,
            task_status_service,
            label_service,
            task_service,
        })
    }
}

impl PgAppState {
    pub fn postgres(config: Config, pool: PgPool) -> Result<Self> {
        let repos = TaskRepositoryBundle {
            task: Arc::new(TaskRepositoryImpl::new(pool.clone())),
            status: Arc::new(TaskStatusRepositoryImpl::new(pool.clone())),
            user: Arc::new(UserRepositoryImpl::new(pool.clone())),
            label: Arc::new(LabelRepositoryImpl::new(pool.clone())),
        };
        Self::from_repositories(config, repos, Some(pool))
    }
}

impl MemoryAppState {
    pub fn in_memory(config: Config) -> Result<Self> {
        let store = MemoryStore::new();
        let repos = TaskRepositoryBundle {
            task: Arc::new(InMemoryTaskRepository::with_store(store.clone())),
            status: Arc::new(InMemoryTaskStatusRepository::with_store(store.clone())),
            user: Arc::new(InMemoryUserRepository::with_store(store.clone())),
            label: Arc::new(InMemoryLabelRepository::with_store(store)),
        };
        Self::from_repositories(config, repos, None)
    }
}

impl<U, S, L, T> HasServices for AppState<U, S, L, T>
where
    U: UserRepository,
    S: TaskStatusRepository,
    L: LabelRepository,
    T: TaskRepository,
{
    type UserRepo = U;
    type TaskStatusRepo = S;
    type LabelRepo = L;
    type TaskRepo = T;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn auth_service(&self) -> &AuthService<U> {
        &self.auth_service
    }

    fn user_service(&self) -> &UserService<U, T> {
        &self.user_service
    }

    fn task_status_service(&self) -> &TaskStatusService<S, T> {
        &self.task_status_service
    }

    fn label_service(&self) -> &LabelService<L, T> {
        &self.label_service
    }

    fn task_service(&self) -> &TaskService<T, S, U, L> {
        &self.task_service
    }

    async fn check_ready(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => true,
        }
    }
}

/// Run the HTTP server until Ctrl-C or SIGTERM
pub async fn run(config: Config, metrics: Option<PrometheusHandle>) -> Result<()> {
    let http_addr = config.http_addr();

    let app = if config.uses_database() {
        let pool = migration::connect(&config.database).await?;
        migration::run_migrations(&pool).await?;
        let state = PgAppState::postgres(config, pool)?;
        migration::seed(&state).await?;
        build_router(state, metrics)
    } else {
        warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
        let state = MemoryAppState::in_memory(config)?;
        migration::seed(&state).await?;
        build_router(state, metrics)
    };

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(api::TOTAL_COUNT_HEADER)])
}

/// Build the HTTP router: API routes, documentation, metrics and static assets
pub fn build_router<S: HasServices>(state: S, metrics: Option<PrometheusHandle>) -> Router {
    let cors = cors_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/welcome", get(api::misc::welcome))
        .route("/error-test", get(api::misc::error_test))
        // Auth
        .route("/api/login", post(api::auth::login::<S>))
        // Users
        .route(
            "/api/users",
            get(api::user::list::<S>).post(api::user::create::<S>),
        )
        .route(
            "/api/users/{id}",
            get(api::user::get::<S>)
                .put(api::user::update::<S>)
                .delete(api::user::delete::<S>),
        )
        // Task statuses
        .route(
            "/api/task_statuses",
            get(api::task_status::list::<S>).post(api::task_status::create::<S>),
        )
        .route(
            "/api/task_statuses/{id}",
            get(api::task_status::get::<S>)
                .put(api::task_status::update::<S>)
                .delete(api::task_status::delete::<S>),
        )
        // Labels
        .route(
            "/api/labels",
            get(api::label::list::<S>).post(api::label::create::<S>),
        )
        .route(
            "/api/labels/{id}",
            get(api::label::get::<S>)
                .put(api::label::update::<S>)
                .delete(api::label::delete::<S>),
        )
        // Tasks
        .route(
            "/api/tasks",
            get(api::task::list::<S>).post(api::task::create::<S>),
        )
        .route(
            "/api/tasks/{id}",
            get(api::task::get::<S>)
                .put(api::task::update::<S>)
                .delete(api::task::delete::<S>),
        )
        // API documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs", ApiDoc::build()))
        .merge(Redoc::with_url("/redoc", ApiDoc::build()));

    if let Some(dir) = static_dir {
        info!("Serving static files from {}", dir);
        router = router.fallback_service(ServeDir::new(dir));
    }

    let metrics_router = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(metrics));

    router
        .with_state(state)
        .merge(metrics_router)
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
}
