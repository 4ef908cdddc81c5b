//! Clinic branch administration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Branch;
use crate::infrastructure::branch::{CreateBranchRequest, UpdateBranchRequest};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateBranchApiRequest {
    pub branch_name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateBranchApiRequest {
    pub branch_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BranchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub branch: Branch,
}

#[derive(Debug, Serialize)]
pub struct BranchDeletedResponse {
    pub message: String,
}

/// GET /api/branches
pub async fn list_branches(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<Branch>>, ApiError> {
    let branches = state.branch_service.list().await?;

    Ok(Json(branches))
}

/// GET /api/branches/{branch_id}
pub async fn get_branch(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(branch_id): Path<i32>,
) -> Result<Json<BranchResponse>, ApiError> {
    let branch = state.branch_service.get(branch_id).await?;

    Ok(Json(BranchResponse {
        message: None,
        branch,
    }))
}

/// POST /api/branches
pub async fn create_branch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateBranchApiRequest>,
) -> Result<(StatusCode, Json<BranchResponse>), ApiError> {
    debug!(admin_id = %admin.id(), branch_name = %request.branch_name, "Admin creating branch");

    let branch = state
        .branch_service
        .create(CreateBranchRequest {
            branch_name: request.branch_name,
            address: request.address,
            phone: request.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BranchResponse {
            message: Some("Branch created successfully".to_string()),
            branch,
        }),
    ))
}

/// PUT /api/branches/{branch_id}
pub async fn update_branch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(branch_id): Path<i32>,
    Json(request): Json<UpdateBranchApiRequest>,
) -> Result<Json<BranchResponse>, ApiError> {
    debug!(admin_id = %admin.id(), branch_id, "Admin updating branch");

    let branch = state
        .branch_service
        .update(
            branch_id,
            UpdateBranchRequest {
                branch_name: request.branch_name,
                address: request.address,
                phone: request.phone,
            },
        )
        .await?;

    Ok(Json(BranchResponse {
        message: Some("Branch updated successfully".to_string()),
        branch,
    }))
}

/// DELETE /api/branches/{branch_id}
pub async fn delete_branch(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(branch_id): Path<i32>,
) -> Result<Json<BranchDeletedResponse>, ApiError> {
    debug!(admin_id = %admin.id(), branch_id, "Admin deleting branch");

    state.branch_service.delete(branch_id).await?;

    Ok(Json(BranchDeletedResponse {
        message: "Branch deleted successfully".to_string(),
    }))
}
