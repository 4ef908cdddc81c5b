//! Branch service for clinic location management

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::domain::branch::{
    validate_new_branch, validate_supplied, Branch, BranchId, BranchRepository, NewBranch,
};
use crate::domain::DomainError;

/// Request for creating a branch
#[derive(Debug, Clone, Default)]
pub struct CreateBranchRequest {
    pub branch_name: String,
    pub address: String,
    pub phone: String,
}

/// Request for updating a branch; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateBranchRequest {
    pub branch_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Trait for branch service operations
#[async_trait]
pub trait BranchServiceTrait: Send + Sync {
    async fn get(&self, id: i32) -> Result<Branch, DomainError>;

    async fn list(&self) -> Result<Vec<Branch>, DomainError>;

    async fn create(&self, request: CreateBranchRequest) -> Result<Branch, DomainError>;

    async fn update(&self, id: i32, request: UpdateBranchRequest) -> Result<Branch, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Branch service
#[derive(Debug)]
pub struct BranchService<R: BranchRepository> {
    repository: Arc<R>,
}

impl<R: BranchRepository> BranchService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn find(&self, id: BranchId) -> Result<Branch, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Branch not found"))
    }
}

#[async_trait]
impl<R: BranchRepository + 'static> BranchServiceTrait for BranchService<R> {
    async fn get(&self, id: i32) -> Result<Branch, DomainError> {
        self.find(BranchId::new(id)).await
    }

    async fn list(&self) -> Result<Vec<Branch>, DomainError> {
        self.repository.list().await
    }

    async fn create(&self, request: CreateBranchRequest) -> Result<Branch, DomainError> {
        validate_new_branch(&request.branch_name, &request.address, &request.phone)?;

        let branch = self
            .repository
            .create(NewBranch {
                branch_name: request.branch_name,
                address: request.address,
                phone: request.phone,
            })
            .await?;

        info!(branch_id = %branch.id(), name = %branch.branch_name(), "Branch created");

        Ok(branch)
    }

    async fn update(&self, id: i32, request: UpdateBranchRequest) -> Result<Branch, DomainError> {
        let mut branch = self.find(BranchId::new(id)).await?;

        if let Some(name) = &request.branch_name {
            validate_supplied("Branch name", name)?;
        }
        if let Some(address) = &request.address {
            validate_supplied("Address", address)?;
        }
        if let Some(phone) = &request.phone {
            validate_supplied("Phone", phone)?;
        }

        if let Some(name) = request.branch_name {
            branch.set_branch_name(name);
        }
        if let Some(address) = request.address {
            branch.set_address(address);
        }
        if let Some(phone) = request.phone {
            branch.set_phone(phone);
        }

        let updated = self.repository.update(&branch).await?;

        info!(branch_id = %updated.id(), "Branch updated");

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let id = BranchId::new(id);

        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found("Branch not found"));
        }

        info!(branch_id = %id, "Branch deleted");

        Ok(())
    }
}
