//! Recording stand-in for yt-dlp, ffmpeg and the HTTP fetcher.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use vidkit_processing::{FetchError, MediaTools, ToolError};

/// Writes recognisable bytes to the requested output instead of running anything.
#[derive(Default)]
pub struct FakeTools {
    calls: Mutex<Vec<String>>,
    fail_download: bool,
    fail_audio: bool,
    fetch_status: Option<u16>,
}

impl FakeTools {
    /// yt-dlp leaves `.part` fragments behind and exits non-zero.
    pub fn failing_download() -> Self {
        Self {
            fail_download: true,
            ..Default::default()
        }
    }

    /// ffmpeg audio extraction exits non-zero.
    pub fn failing_audio() -> Self {
        Self {
            fail_audio: true,
            ..Default::default()
        }
    }

    /// Every fetch gets this HTTP status back.
    pub fn fetch_status(status: u16) -> Self {
        Self {
            fetch_status: Some(status),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaTools for FakeTools {
    async fn download_video(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        self.record(format!("download {}", url));
        if self.fail_download {
            let part = format!("{}.part", output.display());
            tokio::fs::write(part, b"partial").await.unwrap();
            tokio::fs::write(output.with_extension("f137.mp4.part"), b"partial")
                .await
                .unwrap();
            return Err(ToolError::Failed {
                tool: "yt-dlp",
                status: "exit status 1".to_string(),
                stderr: "ERROR: Unable to download video data".to_string(),
            });
        }
        tokio::fs::write(output, b"video:").await.unwrap();
        Ok(())
    }

    async fn extract_audio(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.record("audio".to_string());
        if self.fail_audio {
            return Err(ToolError::Failed {
                tool: "ffmpeg",
                status: "exit status 1".to_string(),
                stderr: "Output file #0 does not contain any stream".to_string(),
            });
        }
        let mut data = tokio::fs::read(input).await.unwrap();
        data.extend_from_slice(b"audio");
        tokio::fs::write(output, data).await.unwrap();
        Ok(())
    }

    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        self.record("thumbnail".to_string());
        let mut data = tokio::fs::read(input).await.unwrap();
        data.extend_from_slice(b"thumb");
        tokio::fs::write(output, data).await.unwrap();
        Ok(())
    }

    async fn fetch_media(&self, url: &str, output: &Path) -> Result<u64, FetchError> {
        self.record(format!("fetch {}", url));
        if let Some(status) = self.fetch_status {
            return Err(FetchError::Status(status));
        }
        tokio::fs::write(output, b"fetched:").await?;
        Ok(8)
    }
}
