//! HTTP error responses
//!
//! Every failure leaves the API as `{"error": {"kind": ..., "message": ...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error kinds reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    ValidationError,
    InvalidRole,
    Conflict,
    NotFound,
    AuthenticationError,
    PermissionError,
    ServerError,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::ValidationError => "validation_error",
            Self::InvalidRole => "invalid_role",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::AuthenticationError => "authentication_error",
            Self::PermissionError => "permission_error",
            Self::ServerError => "server_error",
        };
        write!(f, "{}", kind)
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub kind: ApiErrorKind,
    pub message: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    kind,
                    message: message.into(),
                },
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorKind::ValidationError, message)
    }

    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorKind::InvalidRole, message)
    }

    /// Unique constraint violations are reported as 400
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorKind::AuthenticationError, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ApiErrorKind::PermissionError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorKind::NotFound, message)
    }

    /// Generic 500; the detail stays in the server log
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "Request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorKind::ServerError,
            INTERNAL_MESSAGE,
        )
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.response.error.kind
    }

    pub fn message(&self) -> &str {
        &self.response.error.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidRole { message } => Self::invalid_role(message),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Credential { message } => Self::unauthorized(message),
            err @ (DomainError::Configuration { .. }
            | DomainError::Storage { .. }
            | DomainError::Internal { .. }) => Self::internal(err),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST, ApiErrorKind::ValidationError),
            (DomainError::invalid_role("x"), StatusCode::BAD_REQUEST, ApiErrorKind::InvalidRole),
            (DomainError::conflict("x"), StatusCode::BAD_REQUEST, ApiErrorKind::Conflict),
            (DomainError::not_found("x"), StatusCode::NOT_FOUND, ApiErrorKind::NotFound),
            (DomainError::credential("x"), StatusCode::UNAUTHORIZED, ApiErrorKind::AuthenticationError),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR, ApiErrorKind::ServerError),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR, ApiErrorKind::ServerError),
            (DomainError::configuration("x"), StatusCode::INTERNAL_SERVER_ERROR, ApiErrorKind::ServerError),
        ];

        for (domain_err, status, kind) in cases {
            let api_err = ApiError::from(domain_err);
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.kind(), kind);
        }
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let api_err = ApiError::from(DomainError::storage("connection refused to 10.0.0.5"));

        assert_eq!(api_err.message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let api_err = ApiError::from(DomainError::conflict("This email is already registered."));

        assert_eq!(api_err.message(), "This email is already registered.");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::invalid_role("Invalid role: NURSE");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["kind"], "invalid_role");
        assert_eq!(json["error"]["message"], "Invalid role: NURSE");
    }
}
