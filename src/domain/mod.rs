//! Domain layer - Core business logic and entities

pub mod branch;
pub mod doctor;
pub mod error;
pub mod notification;
pub mod role;
pub mod user;

pub use branch::{Branch, BranchId, BranchRepository, BranchValidationError, NewBranch};
pub use doctor::{DoctorProfile, DoctorProfileChanges, DoctorProfileStore};
pub use error::DomainError;
pub use notification::{NotificationOutcome, OnboardingMessage, OnboardingNotifier};
pub use role::{Role, RoleId, RoleName, RoleRepository};
pub use user::{
    StaffRole, User, UserId, UserRecord, UserRepository, UserTransaction, UserValidationError,
};
