//! External tool invoker.
//!
//! The pipeline talks to the tools through [`MediaTools`] only, so it can be
//! driven by a fake in tests.

pub mod command;
pub mod downloader;
pub mod ffmpeg;
pub mod fetch;

pub use command::ToolError;
pub use downloader::YtDlp;
pub use ffmpeg::Ffmpeg;
pub use fetch::{parse_media_url, FetchError, HttpFetcher};

use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use vidkit_core::Config;

#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Download a remote video to `output` as MP4.
    async fn download_video(&self, url: &str, output: &Path) -> Result<(), ToolError>;

    /// Extract the audio track of `input` into an MP3 at `output`.
    async fn extract_audio(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Extract the first frame of `input` into a JPEG at `output`.
    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), ToolError>;

    /// Fetch a media file over HTTP(S) to `output`.
    async fn fetch_media(&self, url: &str, output: &Path) -> Result<u64, FetchError>;
}

/// The real tools: yt-dlp, ffmpeg and an HTTP client.
pub struct ExternalTools {
    downloader: YtDlp,
    ffmpeg: Ffmpeg,
    fetcher: HttpFetcher,
}

impl ExternalTools {
    pub fn new(ffmpeg_path: &str, yt_dlp_path: &str) -> anyhow::Result<Self> {
        Ok(Self {
            downloader: YtDlp::new(yt_dlp_path).context("Invalid YT_DLP_PATH")?,
            ffmpeg: Ffmpeg::new(ffmpeg_path).context("Invalid FFMPEG_PATH")?,
            fetcher: HttpFetcher::new().context("Failed to create HTTP client")?,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.ffmpeg_path(), config.yt_dlp_path())
    }
}

#[async_trait]
impl MediaTools for ExternalTools {
    async fn download_video(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        self.downloader.download(url, output).await
    }

    async fn extract_audio(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.ffmpeg.extract_audio(input, output).await
    }

    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.ffmpeg.extract_thumbnail(input, output).await
    }

    async fn fetch_media(&self, url: &str, output: &Path) -> Result<u64, FetchError> {
        self.fetcher.fetch_to_file(url, output).await
    }
}
