//! User domain
//!
//! This module provides the staff account aggregate, its validation rules,
//! and the repository traits used by the lifecycle workflow.

mod entity;
mod repository;
mod validation;

pub use entity::{StaffRole, User, UserId, UserRecord};
pub use repository::{UserRepository, UserTransaction};
pub use validation::{
    validate_password, validate_required, UserValidationError, MIN_PASSWORD_LENGTH,
};
