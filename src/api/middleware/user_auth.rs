//! User authentication using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{DomainError, User};

/// Extractor that requires a valid session token
///
/// The token is read from `Authorization: Bearer <jwt>`. The user is loaded
/// fresh on every request, so role changes and deletions take effect before
/// the token expires.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let user = match state.user_service.get(claims.user_id()).await {
            Ok(user) => user,
            Err(DomainError::NotFound { .. }) => {
                return Err(ApiError::unauthorized("User no longer exists"));
            }
            Err(err) => return Err(ApiError::from(err)),
        };

        debug!(user_id = %user.id(), role = %user.role_name(), "Authenticated request");

        Ok(RequireUser(user))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    token.map(String::from).ok_or_else(|| {
        ApiError::unauthorized("Authentication required. Provide 'Authorization: Bearer <token>'")
    })
}
