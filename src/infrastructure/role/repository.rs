//! In-memory role directory

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::role::{Role, RoleId, RoleName, RoleRepository};
use crate::domain::DomainError;

/// In-memory implementation of RoleRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<Vec<Role>>>,
}

impl InMemoryRoleRepository {
    /// Create an empty directory; call `seed` before use
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory already holding every role
    pub fn seeded() -> Self {
        let roles = RoleName::ALL
            .iter()
            .zip(1..)
            .map(|(name, id)| Role::new(RoleId::new(id), *name, name.description()))
            .collect();

        Self {
            roles: Arc::new(RwLock::new(roles)),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().await;
        Ok(roles.iter().find(|r| r.name().as_str() == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let mut roles = self.roles.read().await.clone();
        roles.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(roles)
    }

    async fn seed(&self) -> Result<Vec<Role>, DomainError> {
        let mut roles = self.roles.write().await;

        for name in RoleName::ALL {
            if roles.iter().any(|r| r.name() == name) {
                continue;
            }
            let next_id = roles.iter().map(|r| r.id().value()).max().unwrap_or(0) + 1;
            roles.push(Role::new(RoleId::new(next_id), name, name.description()));
        }

        Ok(roles.clone())
    }
}
