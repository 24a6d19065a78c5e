//! Plain HTTP(S) fetch of a media file to local disk.

use reqwest::{Client, Url};
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid media URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch media: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Media URL returned status {0}")]
    Status(u16),

    #[error("Failed to write fetched media: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse `url` and require an http or https scheme.
pub fn parse_media_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            scheme
        ))),
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Stream the body of `url` into `output`, returning the number of bytes written.
    pub async fn fetch_to_file(&self, url: &str, output: &Path) -> Result<u64, FetchError> {
        let url = parse_media_url(url)?;
        let start = Instant::now();

        let mut response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let mut file = tokio::fs::File::create(output).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::info!(
            url = %url,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fetched media over HTTP"
        );

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_url() {
        assert!(parse_media_url("https://cdn.example.com/a.mp4").is_ok());
        assert!(parse_media_url("http://cdn.example.com/a.mp4").is_ok());
        assert!(matches!(
            parse_media_url("file:///etc/passwd"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_media_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
