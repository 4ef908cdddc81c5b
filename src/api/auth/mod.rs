//! Authentication API endpoints
//!
//! Login issues a JWT session token; `/me` echoes the authenticated user.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Login request; missing fields are reported as a validation error
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = request.username.trim();

    if username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let Some(user) = state
        .user_service
        .authenticate(username, &request.password)
        .await?
    else {
        warn!(username = %username, "Failed login attempt");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let token = state.jwt_service.generate(&user)?;

    info!(user_id = %user.id(), role = %user.role_name(), "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(&user),
    }))
}

/// GET /api/auth/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user: UserResponse::from(&user),
    })
}
