//! Migrate command - applies pending PostgreSQL migrations

use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::infrastructure::storage::{run_storage_migrations, PostgresMigrator};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.storage.backend != StorageBackend::Postgres {
        anyhow::bail!("migrate requires storage.backend = \"postgres\"");
    }

    let pool = crate::connect_postgres(&config.storage).await?;
    let applied = run_storage_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool).current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    Ok(())
}
