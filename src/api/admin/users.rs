//! Staff account administration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Request to create a staff account
///
/// Fields default to empty so that missing values surface as validation
/// errors naming the field rather than as JSON rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateUserApiRequest {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub role_name: String,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

/// Request to update a staff account; absent fields stay unchanged
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserApiRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_name: Option<String>,
    pub license_number: Option<String>,
    pub specialization: Option<String>,
}

impl std::fmt::Debug for UpdateUserApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserApiRequest")
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("role_name", &self.role_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub message: String,
    pub user: UserResponse,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/users
///
/// Responds with a bare array ordered by full name.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .user_service
        .list()
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.user_service.get(&user_id).await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    debug!(
        admin_id = %admin.id(),
        username = %request.username,
        role = %request.role_name,
        "Admin creating user"
    );

    let result = state
        .user_service
        .create(CreateUserRequest {
            full_name: request.full_name,
            username: request.username,
            email: request.email,
            role_name: request.role_name,
            license_number: request.license_number,
            specialization: request.specialization,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            email_sent: result.email_sent(),
            user: UserResponse::from(&result.user),
        }),
    ))
}

/// PUT /api/users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UpdateUserResponse>, ApiError> {
    debug!(admin_id = %admin.id(), user_id = %user_id, "Admin updating user");

    let user = state
        .user_service
        .update(
            &user_id,
            UpdateUserRequest {
                full_name: request.full_name,
                username: request.username,
                email: request.email,
                password: request.password,
                role_name: request.role_name,
                license_number: request.license_number,
                specialization: request.specialization,
            },
        )
        .await?;

    Ok(Json(UpdateUserResponse {
        message: "User updated successfully".to_string(),
        user: UserResponse::from(&user),
    }))
}

/// DELETE /api/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!(admin_id = %admin.id(), user_id = %user_id, "Admin deleting user");

    state.user_service.delete(&user_id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
