//! Application setup and initialization
//!
//! Everything that runs once before the listener starts: validation, scratch
//! directory, storage clients, external tools, pipeline and routes.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::error::set_expose_error_details;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidkit_core::Config;
use vidkit_infra::{init_telemetry, LogFormat};
use vidkit_processing::{ExternalTools, MediaPipeline, MediaTools};
use vidkit_storage::Storage;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let log_format: LogFormat = config.log_format().parse()?;
    init_telemetry(log_format).context("Failed to initialize telemetry")?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    tokio::fs::create_dir_all(config.tmp_dir())
        .await
        .with_context(|| format!("Failed to create TMP_DIR {}", config.tmp_dir().display()))?;

    let clients = storage::setup_storage(&config).await?;

    let tools: Arc<dyn MediaTools> = Arc::new(ExternalTools::from_config(&config)?);
    tracing::info!(
        ffmpeg_path = %config.ffmpeg_path(),
        yt_dlp_path = %config.yt_dlp_path(),
        "External tools configured"
    );

    build_app(config, clients.privileged, tools, clients.restricted)
}

/// Wire already-built storage clients and tools into state and routes.
pub fn build_app(
    config: Config,
    storage: Arc<dyn Storage>,
    tools: Arc<dyn MediaTools>,
    restricted_storage: Option<Arc<dyn Storage>>,
) -> Result<(Arc<AppState>, axum::Router)> {
    set_expose_error_details(!config.is_production());

    let pipeline = Arc::new(MediaPipeline::new(
        storage,
        tools,
        config.storage_bucket(),
        config.tmp_dir().clone(),
    ));

    let state = Arc::new(AppState::new(config, pipeline, restricted_storage));
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
