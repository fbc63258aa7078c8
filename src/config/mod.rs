//! Configuration management for the task manager

use anyhow::{Context, Result};
use std::env;
use std::fmt;

/// Development-only HS256 key, used when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "task-manager-dev-secret-change-me";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Administrator account created at startup
    pub admin: Option<AdminConfig>,
    /// Directory with front-end assets served at `/`
    pub static_dir: Option<String>,
    /// Allowed CORS origins; empty means any
    pub cors_allowed_origins: Vec<String>,
    /// Observability configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. `None` selects the embedded in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_token_ttl_secs: i64,
    pub private_key_pem: Option<String>,
    pub public_key_pem: Option<String>,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("private_key_pem", &self.private_key_pem.as_ref().map(|_| "[REDACTED]"))
            .field("public_key_pem", &self.public_key_pem.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "pretty"
    pub log_format: String,
    pub service_name: String,
    pub environment: String,
    pub sentry_dsn: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "json".to_string(),
            service_name: "task-manager".to_string(),
            environment: "development".to_string(),
            sentry_dsn: None,
            otlp_endpoint: None,
            metrics_enabled: false,
        }
    }
}

impl TelemetryConfig {
    /// Read the observability settings alone, so logging can start before
    /// the rest of the configuration is parsed.
    pub fn from_env() -> Self {
        Self {
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "task-manager".to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            sentry_dsn: env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty()),
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|ep| !ep.is_empty()),
            metrics_enabled: env::var("METRICS_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .or_else(|_| env::var("HTTP_PORT"))
            .unwrap_or_else(|_| "8080".to_string());

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminConfig { email, password })
            }
            _ => None,
        };

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: port.parse().context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .unwrap_or(1),
                acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "self".to_string()),
                audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "task-manager".to_string()),
                access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .unwrap_or(3600),
                private_key_pem: env::var("JWT_PRIVATE_KEY")
                    .ok()
                    .map(|value| value.replace("\\n", "\n")),
                public_key_pem: env::var("JWT_PUBLIC_KEY")
                    .ok()
                    .map(|value| value.replace("\\n", "\n")),
            },
            admin,
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            telemetry: TelemetryConfig::from_env(),
        })
    }

    /// Get HTTP server address; IPv6 hosts are bracketed
    pub fn http_addr(&self) -> String {
        if self.http_host.contains(':') && !self.http_host.starts_with('[') {
            format!("[{}]:{}", self.http_host, self.http_port)
        } else {
            format!("{}:{}", self.http_host, self.http_port)
        }
    }

    /// Whether the PostgreSQL store is configured
    pub fn uses_database(&self) -> bool {
        self.database.url.is_some()
    }

    /// Whether tokens are signed with the built-in development secret
    pub fn uses_dev_jwt_secret(&self) -> bool {
        self.jwt.private_key_pem.is_none() && self.jwt.secret == DEV_JWT_SECRET
    }
}

/// `*` (or an empty value) means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}
