//! Admin API endpoints for staff accounts and clinic branches

pub mod branches;
pub mod users;

use axum::{routing::get, Router};

use super::state::AppState;

/// Create admin API router; every handler requires an ADMIN session
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Staff accounts
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Clinic branches
        .route(
            "/branches",
            get(branches::list_branches).post(branches::create_branch),
        )
        .route(
            "/branches/{branch_id}",
            get(branches::get_branch)
                .put(branches::update_branch)
                .delete(branches::delete_branch),
        )
}
