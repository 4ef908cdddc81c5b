//! Seed command - roles and the bootstrap admin

use tracing::{info, warn};

use crate::config::{AppConfig, StorageBackend};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.storage.backend == StorageBackend::Memory {
        warn!("In-memory backend selected; seeded data is discarded when this command exits");
    }

    let services = crate::build_services(&config).await?;
    crate::seed(&services, &config.bootstrap).await?;

    info!("Seeding complete");
    Ok(())
}
