//! Role directory trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Role, RoleName};
use crate::domain::DomainError;

/// Read access to the seeded role directory
#[async_trait]
pub trait RoleRepository: Send + Sync + Debug {
    /// Look up a role by its stored name; comparison is case-sensitive
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;

    /// All roles ordered by name
    async fn list(&self) -> Result<Vec<Role>, DomainError>;

    /// Insert any missing roles from [`RoleName::ALL`]; existing rows are left as they are
    async fn seed(&self) -> Result<Vec<Role>, DomainError>;

    /// Resolve a role from caller input, uppercasing it first
    ///
    /// Unknown names surface as `InvalidRole`.
    async fn resolve(&self, name: &str) -> Result<Role, DomainError> {
        let normalized = name.trim().to_uppercase();

        self.find_by_name(&normalized)
            .await?
            .ok_or_else(|| DomainError::invalid_role(format!("Invalid role: {}", name)))
    }

    /// Fetch a role that must exist after seeding
    async fn require(&self, name: RoleName) -> Result<Role, DomainError> {
        self.find_by_name(name.as_str()).await?.ok_or_else(|| {
            DomainError::configuration(format!("{} role not found after seeding", name))
        })
    }
}
