//! Admin-only access

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::User;

use super::user_auth::RequireUser;

/// Extractor that requires an authenticated ADMIN user
///
/// Missing or invalid tokens yield 401; authenticated non-admins yield 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            warn!(
                user_id = %user.id(),
                role = %user.role_name(),
                path = %parts.uri.path(),
                "Admin access denied"
            );
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(RequireAdmin(user))
    }
}
