//! User repository traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::doctor::{DoctorProfile, DoctorProfileStore};
use crate::domain::DomainError;

/// Read access to users plus a transaction factory for writes
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by ID, with its role and doctor profile
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by username (for authentication)
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// List all users ordered by full name
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Look up a doctor profile outside any transaction
    async fn doctor_profile(&self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError>;

    /// Start a unit of work
    ///
    /// Dropping the returned transaction without calling `commit` discards
    /// every write made through it.
    async fn begin(&self) -> Result<Box<dyn UserTransaction>, DomainError>;

    /// Check if a user exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }
}

/// Writes to the user and doctor tables that commit or roll back together
#[async_trait]
pub trait UserTransaction: DoctorProfileStore {
    /// Read a user and lock its row until the transaction ends
    async fn get_user(&mut self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Insert the user row only; the doctor profile is written with `upsert`
    async fn insert_user(&mut self, user: &User) -> Result<(), DomainError>;

    /// Overwrite the user row; fails with `NotFound` when the row is gone
    async fn update_user(&mut self, user: &User) -> Result<(), DomainError>;

    /// Delete the user row; returns `false` when it did not exist
    async fn delete_user(&mut self, id: &UserId) -> Result<bool, DomainError>;

    /// Make all writes visible; the transaction cannot be used afterwards
    async fn commit(&mut self) -> Result<(), DomainError>;
}
