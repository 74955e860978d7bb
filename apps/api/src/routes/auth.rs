//! Authentication REST route handlers
//!
//! Provides endpoints for user authentication:
//! - `POST /auth/register` - Create a new user account
//! - `POST /auth/login` - Authenticate and get an access token
//! - `GET /auth/me` - Identity behind the presented bearer token

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::models::{EntityId, User, UserRole};
use crate::services::auth::Registration;
use crate::services::AuthService;

/// Shared application state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    /// Authentication service
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    /// Create new auth state
    pub fn new(auth_service: AuthService) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
        }
    }
}

/// Create authentication router
///
/// `/me` needs the [`AuthService`] in request extensions as well; see
/// [`crate::middleware::AuthUser`].
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(state)
}

// ========== Request/Response Types ==========

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// `user` (default) or `admin`
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Current identity response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: EntityId,
    pub username: String,
    pub role: UserRole,
}

// ========== Route Handlers ==========

/// Register a new user account
///
/// # Response
/// - 201 Created: User registered
/// - 422 Unprocessable Entity: Invalid username, email, password or role
/// - 409 Conflict: Username or email already exists
async fn register(
    State(state): State<AuthState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .auth_service
        .register(Registration {
            username: request.username,
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    let response = RegisterResponse {
        message: "User registered successfully".to_string(),
        username: user.username,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
///
/// # Response
/// - 200 OK: Login successful with a bearer token
/// - 401 Unauthorized: Invalid credentials
async fn login(
    State(state): State<AuthState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (user, access_token) = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.auth_service.access_token_ttl_secs(),
        user: user.into(),
    }))
}

/// Identity of the authenticated caller
///
/// # Response
/// - 200 OK: `{id, username, role}`
/// - 401 Unauthorized: Missing or invalid token
async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user.id,
        username: auth.user.username,
        role: auth.user.role,
    })
}
