//! PostgreSQL role directory

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::domain::role::{Role, RoleId, RoleName, RoleRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of RoleRepository
#[derive(Debug, Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let row = sqlx::query("SELECT id, name, description FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get role: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_role(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let rows = sqlx::query("SELECT id, name, description FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list roles: {}", e)))?;

        rows.iter().map(row_to_role).collect()
    }

    async fn seed(&self) -> Result<Vec<Role>, DomainError> {
        for name in RoleName::ALL {
            let result = sqlx::query(
                "INSERT INTO roles (name, description) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
            )
            .bind(name.as_str())
            .bind(name.description())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to seed role {}: {}", name, e)))?;

            if result.rows_affected() > 0 {
                debug!(role = %name, "Seeded role");
            }
        }

        self.list().await
    }
}

fn row_to_role(row: &sqlx::postgres::PgRow) -> Result<Role, DomainError> {
    let id: i32 = row.get("id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");

    let role_name = RoleName::from_stored(&name)
        .ok_or_else(|| DomainError::storage(format!("Unknown role '{}' in database", name)))?;

    Ok(Role::new(RoleId::new(id), role_name, description.unwrap_or_default()))
}
