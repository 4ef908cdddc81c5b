//! Branch repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Branch, BranchId, NewBranch};
use crate::domain::DomainError;

#[async_trait]
pub trait BranchRepository: Send + Sync + Debug {
    async fn get(&self, id: BranchId) -> Result<Option<Branch>, DomainError>;

    /// All branches ordered by branch name
    async fn list(&self) -> Result<Vec<Branch>, DomainError>;

    /// Store a new branch; the repository assigns the identifier
    async fn create(&self, branch: NewBranch) -> Result<Branch, DomainError>;

    /// Overwrite an existing branch; fails with `NotFound` when it is gone
    async fn update(&self, branch: &Branch) -> Result<Branch, DomainError>;

    /// Returns `false` when the branch did not exist
    async fn delete(&self, id: BranchId) -> Result<bool, DomainError>;
}
