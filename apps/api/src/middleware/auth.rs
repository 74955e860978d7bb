//! Authentication extractors for Axum handlers
//!
//! This module provides Axum extractors for authentication:
//! - `AuthUser`: Requires valid JWT token, returns 401 if missing/invalid
//! - `MaybeAuthUser`: Optional authentication, yields the verified claims if any
//!
//! Both read the [`AuthService`] from request extensions, so the router must
//! carry an `Extension(auth_service)` layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::middleware::{AuthUser, MaybeAuthUser};
//!
//! // Require authentication
//! async fn protected_handler(auth: AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", auth.user.username)
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ApiError, ErrorResponse};
use crate::models::{Claims, User};
use crate::services::auth::extract_bearer_token;
use crate::services::AuthService;

/// Authenticated user extractor - requires valid authentication
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The authenticated user
    pub user: User,
    /// JWT claims from the access token
    pub claims: Claims,
}

/// Optional authentication extractor
///
/// Never rejects: a missing, malformed or expired token yields `None`.
#[derive(Debug, Clone, Default)]
pub struct MaybeAuthUser {
    /// Verified claims, if a valid token was presented
    pub claims: Option<Claims>,
}

/// Authentication rejection types
#[derive(Debug)]
pub enum AuthRejection {
    /// Missing or invalid Authorization header
    MissingToken,
    /// Token is malformed or expired
    InvalidToken(String),
    /// Account behind the token no longer exists or could not be loaded
    Lookup(ApiError),
    /// Missing required services in request extensions
    MissingServices,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthRejection::MissingToken => {
                tracing::debug!("Authentication rejected: missing token");
                (StatusCode::UNAUTHORIZED, ApiError::Unauthorized)
            }
            AuthRejection::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Authentication rejected: invalid token");
                (StatusCode::UNAUTHORIZED, ApiError::InvalidToken(reason))
            }
            AuthRejection::Lookup(error) => {
                error.log();
                (error.status_code(), error)
            }
            AuthRejection::MissingServices => {
                tracing::error!("Authentication rejected: missing services in request extensions");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::Internal("Authentication services not configured".to_string()),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: error.error_code(),
            message: error.public_message(),
        });

        (status, body).into_response()
    }
}

/// Read the bearer token from the Authorization header
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let auth_service = parts
            .extensions
            .get::<AuthService>()
            .ok_or(AuthRejection::MissingServices)?;

        let claims = auth_service
            .verify_access_token(token)
            .map_err(|e| AuthRejection::InvalidToken(e.to_string()))?;

        let user = auth_service
            .current_user(&claims)
            .await
            .map_err(AuthRejection::Lookup)?;

        Ok(AuthUser { user, claims })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeAuthUser::default());
        };

        let Some(auth_service) = parts.extensions.get::<AuthService>() else {
            tracing::warn!("AuthService not in extensions for MaybeAuthUser");
            return Ok(MaybeAuthUser::default());
        };

        match auth_service.verify_access_token(token) {
            Ok(claims) => Ok(MaybeAuthUser {
                claims: Some(claims),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Token verification failed in MaybeAuthUser");
                Ok(MaybeAuthUser::default())
            }
        }
    }
}
