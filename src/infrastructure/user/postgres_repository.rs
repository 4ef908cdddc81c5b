//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use super::repository::assemble_user;
use crate::domain::doctor::{DoctorProfile, DoctorProfileChanges, DoctorProfileStore};
use crate::domain::role::{RoleId, RoleName};
use crate::domain::user::{User, UserId, UserRecord, UserRepository, UserTransaction};
use crate::domain::DomainError;

const SELECT_USER: &str = r#"
    SELECT u.id, u.full_name, u.username, u.email, u.password_hash, u.role_id,
           r.name AS role_name, u.created_at, u.updated_at,
           d.user_id AS doctor_user_id, d.license_number, d.specialization
    FROM users u
    JOIN roles r ON r.id = u.role_id
    LEFT JOIN doctors d ON d.user_id = u.id
"#;

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE u.id = $1", SELECT_USER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE u.username = $1", SELECT_USER))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!("{} ORDER BY u.full_name ASC", SELECT_USER))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    async fn doctor_profile(&self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, license_number, specialization FROM doctors WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get doctor profile: {}", e)))?;

        Ok(row.map(|row| row_to_profile(&row)))
    }

    async fn begin(&self) -> Result<Box<dyn UserTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUserTransaction { tx: Some(tx) }))
    }
}

/// Wraps a sqlx transaction; dropping it before `commit` rolls back
struct PostgresUserTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresUserTransaction {
    fn conn(&mut self) -> Result<&mut Transaction<'static, Postgres>, DomainError> {
        self.tx
            .as_mut()
            .ok_or_else(|| DomainError::internal("Transaction already committed"))
    }
}

#[async_trait]
impl DoctorProfileStore for PostgresUserTransaction {
    async fn upsert(
        &mut self,
        user_id: &UserId,
        changes: DoctorProfileChanges,
    ) -> Result<DoctorProfile, DomainError> {
        let tx = self.conn()?;

        let row = sqlx::query(
            r#"
            INSERT INTO doctors (user_id, license_number, specialization)
            VALUES ($1, COALESCE($2::text, ''), COALESCE($3::text, ''))
            ON CONFLICT (user_id) DO UPDATE
            SET license_number = COALESCE($2::text, doctors.license_number),
                specialization = COALESCE($3::text, doctors.specialization)
            RETURNING user_id, license_number, specialization
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(changes.license_number)
        .bind(changes.specialization)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to upsert doctor profile"))?;

        Ok(row_to_profile(&row))
    }

    async fn delete_by_user(&mut self, user_id: &UserId) -> Result<bool, DomainError> {
        let tx = self.conn()?;

        let result = sqlx::query("DELETE FROM doctors WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete doctor profile: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_by_user(&mut self, user_id: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        let tx = self.conn()?;

        let row = sqlx::query(
            "SELECT user_id, license_number, specialization FROM doctors WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get doctor profile: {}", e)))?;

        Ok(row.map(|row| row_to_profile(&row)))
    }
}

#[async_trait]
impl UserTransaction for PostgresUserTransaction {
    async fn get_user(&mut self, id: &UserId) -> Result<Option<User>, DomainError> {
        let tx = self.conn()?;

        // Only the user row is locked; outer-joined doctor rows cannot be
        let row = sqlx::query(&format!("{} WHERE u.id = $1 FOR UPDATE OF u", SELECT_USER))
            .bind(id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to lock user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert_user(&mut self, user: &User) -> Result<(), DomainError> {
        let tx = self.conn()?;

        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, username, email, password_hash, role_id,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.full_name())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.role_id().value())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create user"))?;

        Ok(())
    }

    async fn update_user(&mut self, user: &User) -> Result<(), DomainError> {
        let tx = self.conn()?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = $2, username = $3, email = $4, password_hash = $5,
                role_id = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.full_name())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.role_id().value())
        .bind(user.updated_at())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("User '{}' not found", user.id())));
        }

        Ok(())
    }

    async fn delete_user(&mut self, id: &UserId) -> Result<bool, DomainError> {
        let tx = self.conn()?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| DomainError::internal("Transaction already committed"))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))
    }
}

/// Map unique violations to `Conflict`, everything else to `Storage`
pub(crate) fn map_write_error(err: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = db.constraint().map(constraint_field).unwrap_or("field");
            return DomainError::conflict(format!("This {} is already registered.", field));
        }
    }

    DomainError::storage(format!("{}: {}", context, err))
}

/// Column name behind a unique constraint
fn constraint_field(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "username",
        "users_email_key" => "email",
        "doctors_user_id_key" => "user",
        "roles_name_key" => "name",
        _ => "field",
    }
}

fn row_to_profile(row: &sqlx::postgres::PgRow) -> DoctorProfile {
    let user_id: Uuid = row.get("user_id");
    let license_number: String = row.get("license_number");
    let specialization: String = row.get("specialization");

    DoctorProfile::new(UserId::from(user_id), license_number, specialization)
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: Uuid = row.get("id");
    let role_name: String = row.get("role_name");
    let role_id: i32 = row.get("role_id");

    let role_name = RoleName::from_stored(&role_name).ok_or_else(|| {
        DomainError::storage(format!("Unknown role '{}' in database", role_name))
    })?;

    let record = UserRecord {
        id: UserId::from(id),
        full_name: row.get("full_name"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role_id: RoleId::new(role_id),
        role_name,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };

    let doctor_user_id: Option<Uuid> = row.get("doctor_user_id");
    let doctor = doctor_user_id.map(|user_id| {
        let license_number: String = row.get("license_number");
        let specialization: String = row.get("specialization");
        DoctorProfile::new(UserId::from(user_id), license_number, specialization)
    });

    assemble_user(record, doctor)
}
