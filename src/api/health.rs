//! Service status endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::state::AppState;
use super::types::Json;
use crate::domain::RoleName;

#[derive(Debug, Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Eye Care System API is running",
    })
}

/// GET /health - liveness
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
        checks: None,
        latency_ms: None,
    })
}

/// GET /ready - the role directory must be reachable and fully seeded
pub async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();
    let check = check_role_directory(&state).await;
    let status = check.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        checks: Some(vec![check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (code, Json(response))
}

async fn check_role_directory(state: &AppState) -> HealthCheck {
    let (status, message) = match state.roles.list().await {
        Ok(roles) => {
            let missing: Vec<&str> = RoleName::ALL
                .iter()
                .filter(|name| !roles.iter().any(|role| role.name() == **name))
                .map(|name| name.as_str())
                .collect();

            if missing.is_empty() {
                (HealthStatus::Healthy, None)
            } else {
                (
                    HealthStatus::Unhealthy,
                    Some(format!("Missing roles: {}", missing.join(", "))),
                )
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Role directory check failed");
            (HealthStatus::Unhealthy, Some("Role directory unavailable".to_string()))
        }
    };

    HealthCheck {
        name: "role_directory",
        status,
        message,
    }
}
