//! Vidkit Core Library
//!
//! This crate provides the configuration, error taxonomy and media kinds
//! shared by every vidkit component.

pub mod config;
pub mod constants;
pub mod error;
pub mod media;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use media::MediaKind;
pub use storage_types::{StorageBackend, StorageCredential};
// Note: Storage, StorageError, StorageResult live in the vidkit-storage crate
