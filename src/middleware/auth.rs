//! JWT authentication extractors
//!
//! Provides:
//! - `AuthUser` extractor for handlers requiring authenticated users
//! - `OptionalAuth` for handlers where a token is optional

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use crate::domain::ROLE_ADMIN;
use crate::error::AppError;
use crate::jwt::AccessClaims;
use crate::service::Caller;
use crate::state::HasServices;

/// Authenticated user information extracted from JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User's email address (the token's `sub` claim)
    pub email: String,
    /// Granted authorities
    pub authorities: Vec<String>,
}

impl AuthUser {
    pub fn from_claims(claims: AccessClaims) -> Self {
        Self {
            email: claims.sub,
            authorities: claims.authorities,
        }
    }

    /// Check if user has a specific authority
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    pub fn is_admin(&self) -> bool {
        self.has_authority(ROLE_ADMIN)
    }

    /// Borrow as the acting principal for service calls
    pub fn caller(&self) -> Caller<'_> {
        Caller {
            email: &self.email,
            is_admin: self.is_admin(),
        }
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken(String),
    /// Token has expired
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidHeader(_) => (StatusCode::UNAUTHORIZED, "Invalid authorization header"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired"),
        };

        let body = serde_json::json!({
            "error": message,
            "code": "UNAUTHORIZED"
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Extract and validate Bearer token from Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AuthError::InvalidHeader("Authorization header must use Bearer scheme".to_string())
        })
}

/// Axum extractor for authenticated users
///
/// ```ignore
/// async fn protected_handler(auth: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth.email)
/// }
/// ```
impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        match state.jwt_manager().verify_access_token(token) {
            Ok(claims) => Ok(AuthUser::from_claims(claims)),
            Err(AppError::Jwt(e)) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AuthError::TokenExpired)
            }
            Err(e) => Err(AuthError::InvalidToken(e.to_string())),
        }
    }
}

/// Optional authentication extractor
///
/// Returns `Some(AuthUser)` if a valid token is present, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: HasServices + Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
