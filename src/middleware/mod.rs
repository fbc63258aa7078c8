//! HTTP middleware
//!
//! - JWT `AuthUser` extractor
//! - Security headers
//! - Error body normalization
//! - Request ID and metrics layer
//! - Log-safe request spans

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod security_headers;
pub mod trace;

pub use auth::{AuthError, AuthUser, OptionalAuth};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use security_headers::security_headers_middleware;
pub use trace::SanitizedMakeSpan;
