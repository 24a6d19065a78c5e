//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vidkit_core::Config;
use vidkit_storage::{create_storage, Storage, StorageCredential, StorageError};

pub struct StorageClients {
    /// Service-role client used by the pipeline for every read and write.
    pub privileged: Arc<dyn Storage>,
    /// Anon client used by the readiness probe, if the key is configured.
    pub restricted: Option<Arc<dyn Storage>>,
}

/// Build both storage clients. A missing privileged key is fatal; a missing
/// restricted key is logged and surfaces later through `/ready`.
pub async fn setup_storage(config: &Config) -> Result<StorageClients> {
    tracing::info!(
        backend = %config.storage_backend(),
        bucket = %config.storage_bucket(),
        "Initializing storage clients..."
    );

    let privileged = create_storage(config, StorageCredential::ServiceRole)
        .await
        .context("Failed to create service-role storage client")?;

    let restricted = match create_storage(config, StorageCredential::Anon).await {
        Ok(storage) => Some(storage),
        Err(StorageError::ConfigError(msg)) => {
            tracing::warn!(error = %msg, "Restricted storage client not configured; /ready will report it");
            None
        }
        Err(e) => return Err(e).context("Failed to create restricted storage client"),
    };

    tracing::info!(
        backend = ?privileged.backend_type(),
        restricted = restricted.is_some(),
        "Storage clients initialized successfully"
    );

    Ok(StorageClients {
        privileged,
        restricted,
    })
}
