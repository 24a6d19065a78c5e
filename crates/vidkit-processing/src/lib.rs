//! Vidkit Media Processing Library
//!
//! This crate drives the external media tools (yt-dlp, ffmpeg) and sequences
//! the fetch, derive, persist and cleanup steps of every pipeline operation.

pub mod error;
pub mod pipeline;
pub mod scratch;
pub mod tools;

// Re-export commonly used types
pub use error::PipelineError;
pub use pipeline::{
    AudioOutcome, DownloadOutcome, ExtractOutcome, ExtractSelection, MediaPipeline,
    UrlAudioOutcome,
};
pub use scratch::ScratchDir;
pub use tools::{ExternalTools, FetchError, MediaTools, ToolError};
