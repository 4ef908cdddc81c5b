//! Application state for shared services

use std::sync::Arc;

use crate::domain::role::RoleRepository;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::branch::BranchServiceTrait;
use crate::infrastructure::user::UserServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub branch_service: Arc<dyn BranchServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub roles: Arc<dyn RoleRepository>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        branch_service: Arc<dyn BranchServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        roles: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            user_service,
            branch_service,
            jwt_service,
            roles,
        }
    }
}
