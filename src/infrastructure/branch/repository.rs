//! In-memory branch repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::branch::{Branch, BranchId, BranchRepository, NewBranch};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct BranchTable {
    rows: BTreeMap<BranchId, Branch>,
    next_id: i32,
}

/// In-memory implementation of BranchRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryBranchRepository {
    table: Arc<RwLock<BranchTable>>,
}

impl InMemoryBranchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BranchRepository for InMemoryBranchRepository {
    async fn get(&self, id: BranchId) -> Result<Option<Branch>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Branch>, DomainError> {
        let table = self.table.read().await;

        let mut branches: Vec<Branch> = table.rows.values().cloned().collect();
        branches.sort_by(|a, b| a.branch_name().cmp(b.branch_name()));
        Ok(branches)
    }

    async fn create(&self, branch: NewBranch) -> Result<Branch, DomainError> {
        let mut table = self.table.write().await;

        table.next_id += 1;
        let id = BranchId::new(table.next_id);
        let now = Utc::now();
        let branch = Branch::new(id, branch.branch_name, branch.address, branch.phone, now, now);

        table.rows.insert(id, branch.clone());
        Ok(branch)
    }

    async fn update(&self, branch: &Branch) -> Result<Branch, DomainError> {
        let mut table = self.table.write().await;

        match table.rows.get_mut(&branch.id()) {
            Some(row) => {
                *row = branch.clone();
                Ok(branch.clone())
            }
            None => Err(DomainError::not_found("Branch not found")),
        }
    }

    async fn delete(&self, id: BranchId) -> Result<bool, DomainError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_branch(name: &str) -> NewBranch {
        NewBranch {
            branch_name: name.to_string(),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryBranchRepository::new();

        let first = repo.create(new_branch("North")).await.unwrap();
        let second = repo.create(new_branch("South")).await.unwrap();

        assert_eq!(first.id().value(), 1);
        assert_eq!(second.id().value(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = InMemoryBranchRepository::new();

        let first = repo.create(new_branch("North")).await.unwrap();
        assert!(repo.delete(first.id()).await.unwrap());
        assert!(!repo.delete(first.id()).await.unwrap());

        let second = repo.create(new_branch("South")).await.unwrap();
        assert_eq!(second.id().value(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_branch() {
        let repo = InMemoryBranchRepository::new();
        let now = Utc::now();
        let ghost = Branch::new(BranchId::new(9), "Ghost", "Nowhere", "000", now, now);

        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
