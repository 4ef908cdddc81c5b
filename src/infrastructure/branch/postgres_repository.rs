//! PostgreSQL branch repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::branch::{Branch, BranchId, BranchRepository, NewBranch};
use crate::domain::DomainError;
use crate::infrastructure::user::map_write_error;

/// PostgreSQL implementation of BranchRepository
#[derive(Debug, Clone)]
pub struct PostgresBranchRepository {
    pool: PgPool,
}

impl PostgresBranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PostgresBranchRepository {
    async fn get(&self, id: BranchId) -> Result<Option<Branch>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, branch_name, address, phone, created_at, updated_at
            FROM branches
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get branch: {}", e)))?;

        Ok(row.map(|row| row_to_branch(&row)))
    }

    async fn list(&self) -> Result<Vec<Branch>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, branch_name, address, phone, created_at, updated_at
            FROM branches
            ORDER BY branch_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list branches: {}", e)))?;

        Ok(rows.iter().map(row_to_branch).collect())
    }

    async fn create(&self, branch: NewBranch) -> Result<Branch, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO branches (branch_name, address, phone)
            VALUES ($1, $2, $3)
            RETURNING id, branch_name, address, phone, created_at, updated_at
            "#,
        )
        .bind(&branch.branch_name)
        .bind(&branch.address)
        .bind(&branch.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create branch"))?;

        Ok(row_to_branch(&row))
    }

    async fn update(&self, branch: &Branch) -> Result<Branch, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE branches
            SET branch_name = $2, address = $3, phone = $4, updated_at = $5
            WHERE id = $1
            RETURNING id, branch_name, address, phone, created_at, updated_at
            "#,
        )
        .bind(branch.id().value())
        .bind(branch.branch_name())
        .bind(branch.address())
        .bind(branch.phone())
        .bind(branch.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update branch"))?;

        row.map(|row| row_to_branch(&row))
            .ok_or_else(|| DomainError::not_found("Branch not found"))
    }

    async fn delete(&self, id: BranchId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete branch: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_branch(row: &sqlx::postgres::PgRow) -> Branch {
    let id: i32 = row.get("id");

    Branch::new(
        BranchId::new(id),
        row.get::<String, _>("branch_name"),
        row.get::<String, _>("address"),
        row.get::<String, _>("phone"),
        row.get("created_at"),
        row.get("updated_at"),
    )
}
