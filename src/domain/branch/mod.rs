//! Branch (clinic location) domain

mod entity;
mod repository;
mod validation;

pub use entity::{Branch, BranchId, NewBranch};
pub use repository::BranchRepository;
pub use validation::{validate_new_branch, validate_supplied, BranchValidationError};
