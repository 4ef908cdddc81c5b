//! Versioned PostgreSQL schema

use std::collections::HashSet;

use sqlx::postgres::PgPool;
use sqlx::Executor;
use tracing::info;

use crate::domain::DomainError;

/// Applies [`Migration`]s in version order, recording each in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_history_table(&self) -> Result<(), DomainError> {
        self.pool
            .execute(
                r#"
                CREATE TABLE IF NOT EXISTS _migrations (
                    version BIGINT PRIMARY KEY,
                    description TEXT NOT NULL,
                    installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
            )
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create migration history: {}", e)))?;

        Ok(())
    }

    async fn applied_versions(&self) -> Result<HashSet<i64>, DomainError> {
        let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM _migrations")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read migration history: {}", e)))?;

        Ok(versions.into_iter().collect())
    }

    /// Apply every migration not yet recorded; returns how many ran
    ///
    /// Each migration and its history row commit in one transaction, so a
    /// failed migration leaves no partial schema behind.
    pub async fn migrate(&self, migrations: &[Migration]) -> Result<usize, DomainError> {
        self.ensure_history_table().await?;
        let applied = self.applied_versions().await?;

        let mut pending: Vec<&Migration> = migrations
            .iter()
            .filter(|m| !applied.contains(&m.version))
            .collect();
        pending.sort_by_key(|m| m.version);

        for migration in &pending {
            self.apply(migration).await?;
        }

        Ok(pending.len())
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DomainError> {
        let failed = |stage: &str, e: sqlx::Error| {
            DomainError::storage(format!(
                "Migration {} ({}) failed to {}: {}",
                migration.version, migration.description, stage, e
            ))
        };

        let mut tx = self.pool.begin().await.map_err(|e| failed("begin", e))?;

        // Plain string executes over the simple protocol, allowing several statements
        (&mut *tx)
            .execute(migration.up)
            .await
            .map_err(|e| failed("run", e))?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| failed("record", e))?;

        tx.commit().await.map_err(|e| failed("commit", e))?;

        info!(version = migration.version, description = migration.description, "Applied migration");
        Ok(())
    }

    /// Latest applied version, `None` on a fresh database
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_history_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read migration history: {}", e)))
    }
}

/// A versioned schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
}

impl Migration {
    pub const fn new(version: i64, description: &'static str, up: &'static str) -> Self {
        Self {
            version,
            description,
            up,
        }
    }
}

/// Schema for roles, users, doctor profiles and branches
pub fn storage_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create roles table",
            r#"
            CREATE TABLE IF NOT EXISTS roles (
                id SERIAL PRIMARY KEY,
                name VARCHAR(64) NOT NULL,
                description TEXT,
                CONSTRAINT roles_name_key UNIQUE (name)
            );
            "#,
        ),
        Migration::new(
            2,
            "Create users table",
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                full_name VARCHAR(255) NOT NULL,
                username VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                password_hash TEXT NOT NULL,
                role_id INTEGER NOT NULL REFERENCES roles(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_username_key UNIQUE (username),
                CONSTRAINT users_email_key UNIQUE (email)
            );
            CREATE INDEX IF NOT EXISTS idx_users_full_name ON users(full_name);
            CREATE INDEX IF NOT EXISTS idx_users_role_id ON users(role_id);
            "#,
        ),
        Migration::new(
            3,
            "Create doctors table",
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                id SERIAL PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                license_number VARCHAR(255) NOT NULL,
                specialization VARCHAR(255) NOT NULL,
                CONSTRAINT doctors_user_id_key UNIQUE (user_id)
            );
            "#,
        ),
        Migration::new(
            4,
            "Create branches table",
            r#"
            CREATE TABLE IF NOT EXISTS branches (
                id SERIAL PRIMARY KEY,
                branch_name VARCHAR(255) NOT NULL,
                address TEXT NOT NULL,
                phone VARCHAR(64) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_branches_name ON branches(branch_name);
            "#,
        ),
    ]
}

/// Apply all pending storage migrations; returns how many ran
pub async fn run_storage_migrations(pool: &PgPool) -> Result<usize, DomainError> {
    PostgresMigrator::new(pool.clone())
        .migrate(&storage_migrations())
        .await
}
