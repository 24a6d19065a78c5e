use std::sync::Arc;
use vidkit_core::Config;
use vidkit_processing::MediaPipeline;
use vidkit_storage::Storage;

/// Shared, immutable application state.
///
/// Built once at start-up; handlers receive it as `State<Arc<AppState>>`.
pub struct AppState {
    pub config: Config,
    /// Orchestrator bound to the privileged storage client.
    pub pipeline: Arc<MediaPipeline>,
    /// Client bound to the restricted credential, used by the readiness probe.
    /// `None` when that credential is not configured.
    pub restricted_storage: Option<Arc<dyn Storage>>,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: Arc<MediaPipeline>,
        restricted_storage: Option<Arc<dyn Storage>>,
    ) -> Self {
        Self {
            config,
            pipeline,
            restricted_storage,
        }
    }

    pub fn bucket(&self) -> &str {
        self.config.storage_bucket()
    }
}
