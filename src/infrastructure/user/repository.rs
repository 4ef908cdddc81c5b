//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use tracing::warn;

use crate::domain::doctor::{DoctorProfile, DoctorProfileChanges, DoctorProfileStore};
use crate::domain::user::{User, UserId, UserRecord, UserRepository, UserTransaction};
use crate::domain::DomainError;

/// Combine a stored user row with its doctor profile row
///
/// A profile left behind for a non-doctor user is ignored; a doctor without
/// a profile is reported as an internal inconsistency.
pub(crate) fn assemble_user(
    record: UserRecord,
    doctor: Option<DoctorProfile>,
) -> Result<User, DomainError> {
    let id = record.id.clone();
    let doctor = match doctor {
        Some(_) if !record.role_name.is_doctor() => {
            warn!(user_id = %id, role = %record.role_name, "Ignoring doctor profile on non-doctor user");
            None
        }
        other => other,
    };

    User::from_record(record, doctor)
        .map_err(|e| DomainError::internal(format!("Inconsistent user '{}': {}", id, e)))
}

#[derive(Debug, Clone, Default)]
struct UserTables {
    users: HashMap<UserId, UserRecord>,
    doctors: HashMap<UserId, DoctorProfile>,
}

impl UserTables {
    fn user(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        match self.users.get(id) {
            Some(record) => assemble_user(record.clone(), self.doctors.get(id).cloned()).map(Some),
            None => Ok(None),
        }
    }

    /// Unique checks on username and email, ignoring the row being written
    fn check_unique(&self, record: &UserRecord) -> Result<(), DomainError> {
        for other in self.users.values().filter(|u| u.id != record.id) {
            if other.username == record.username {
                return Err(DomainError::conflict("This username is already registered."));
            }
            if other.email == record.email {
                return Err(DomainError::conflict("This email is already registered."));
            }
        }

        Ok(())
    }
}

/// In-memory implementation of UserRepository
///
/// A transaction holds the write lock for its whole lifetime and works on a
/// copy of the tables, which replaces the live tables on commit.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<UserTables>>,
    fail_doctor_writes: Arc<AtomicBool>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent doctor profile write fail with a storage error
    pub fn fail_doctor_writes(&self, fail: bool) {
        self.fail_doctor_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        tables.user(id)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;

        match tables.users.values().find(|u| u.username == username) {
            Some(record) => tables.user(&record.id),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;

        let mut records: Vec<&UserRecord> = tables.users.values().collect();
        records.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        records
            .into_iter()
            .map(|record| assemble_user(record.clone(), tables.doctors.get(&record.id).cloned()))
            .collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.tables.read().await.users.len())
    }

    async fn doctor_profile(&self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        Ok(self.tables.read().await.doctors.get(user_id).cloned())
    }

    async fn begin(&self) -> Result<Box<dyn UserTransaction>, DomainError> {
        let guard = Arc::clone(&self.tables).write_owned().await;
        let staged = (*guard).clone();

        Ok(Box::new(InMemoryUserTransaction {
            guard,
            staged,
            fail_doctor_writes: self.fail_doctor_writes.load(Ordering::SeqCst),
            committed: false,
        }))
    }
}

struct InMemoryUserTransaction {
    guard: OwnedRwLockWriteGuard<UserTables>,
    staged: UserTables,
    fail_doctor_writes: bool,
    committed: bool,
}

impl InMemoryUserTransaction {
    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.committed {
            return Err(DomainError::internal("Transaction already committed"));
        }
        Ok(())
    }
}

#[async_trait]
impl DoctorProfileStore for InMemoryUserTransaction {
    async fn upsert(
        &mut self,
        user_id: &UserId,
        changes: DoctorProfileChanges,
    ) -> Result<DoctorProfile, DomainError> {
        self.ensure_open()?;

        if self.fail_doctor_writes {
            return Err(DomainError::storage("Failed to write doctor profile"));
        }
        if !self.staged.users.contains_key(user_id) {
            return Err(DomainError::not_found(format!("User '{}' not found", user_id)));
        }

        let profile = changes.apply(user_id, self.staged.doctors.get(user_id));
        self.staged.doctors.insert(user_id.clone(), profile.clone());

        Ok(profile)
    }

    async fn delete_by_user(&mut self, user_id: &UserId) -> Result<bool, DomainError> {
        self.ensure_open()?;

        if self.fail_doctor_writes {
            return Err(DomainError::storage("Failed to delete doctor profile"));
        }

        Ok(self.staged.doctors.remove(user_id).is_some())
    }

    async fn get_by_user(&mut self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        self.ensure_open()?;
        Ok(self.staged.doctors.get(user_id).cloned())
    }
}

#[async_trait]
impl UserTransaction for InMemoryUserTransaction {
    async fn get_user(&mut self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.ensure_open()?;
        self.staged.user(id)
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), DomainError> {
        self.ensure_open()?;

        let record = user.to_record();
        if self.staged.users.contains_key(&record.id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                record.id
            )));
        }
        self.staged.check_unique(&record)?;

        self.staged.users.insert(record.id.clone(), record);
        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), DomainError> {
        self.ensure_open()?;

        let record = user.to_record();
        if !self.staged.users.contains_key(&record.id) {
            return Err(DomainError::not_found(format!("User '{}' not found", record.id)));
        }
        self.staged.check_unique(&record)?;

        self.staged.users.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete_user(&mut self, id: &UserId) -> Result<bool, DomainError> {
        self.ensure_open()?;

        // Cascades to the doctor profile
        self.staged.doctors.remove(id);
        Ok(self.staged.users.remove(id).is_some())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        self.ensure_open()?;

        *self.guard = std::mem::take(&mut self.staged);
        self.committed = true;
        Ok(())
    }
}
