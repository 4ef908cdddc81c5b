//! Doctor profile store trait

use async_trait::async_trait;

use super::entity::{DoctorProfile, DoctorProfileChanges};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Doctor profile writes, always performed inside a user transaction
#[async_trait]
pub trait DoctorProfileStore: Send {
    /// Create the profile if absent, otherwise update only the supplied fields
    async fn upsert(
        &mut self,
        user_id: &UserId,
        changes: DoctorProfileChanges,
    ) -> Result<DoctorProfile, DomainError>;

    /// Remove the profile; returns `false` when there was nothing to delete
    async fn delete_by_user(&mut self, user_id: &UserId) -> Result<bool, DomainError>;

    async fn get_by_user(&mut self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError>;
}
