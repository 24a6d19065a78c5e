use crate::tools::{FetchError, ToolError};
use thiserror::Error;
use vidkit_core::AppError;
use vidkit_storage::StorageError;

/// Failure of a pipeline operation. The first failing step aborts the operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(StorageError),

    #[error("Scratch file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => {
                PipelineError::NotFound(format!("Object not found in storage: {}", key))
            }
            StorageError::InvalidKey(msg) => PipelineError::InvalidInput(msg),
            other => PipelineError::Storage(other),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => AppError::InvalidInput(msg),
            PipelineError::NotFound(msg) => AppError::NotFound(msg),
            PipelineError::Tool(e) => AppError::ToolExecution(e.to_string()),
            PipelineError::Fetch(FetchError::InvalidUrl(msg)) => {
                AppError::InvalidInput(format!("Invalid media URL: {}", msg))
            }
            PipelineError::Fetch(e) => AppError::MediaFetch(e.to_string()),
            PipelineError::Storage(e) => AppError::Storage(e.to_string()),
            PipelineError::Io(e) => AppError::Internal(format!("Scratch file error: {}", e)),
        }
    }
}
