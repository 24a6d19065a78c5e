//! yt-dlp invocation for fetching remote videos.

use super::command::{run_tool, validate_tool_path, ToolError};
use std::path::Path;

const TOOL: &str = "yt-dlp";

pub struct YtDlp {
    yt_dlp_path: String,
}

impl YtDlp {
    pub fn new(yt_dlp_path: impl Into<String>) -> Result<Self, ToolError> {
        let yt_dlp_path = yt_dlp_path.into();
        validate_tool_path(TOOL, &yt_dlp_path)?;
        Ok(Self { yt_dlp_path })
    }

    /// Best video plus best audio merged into MP4, falling back to the best single format.
    ///
    /// `--` keeps a URL starting with `-` from being read as an option.
    pub fn download_args(url: &str, output: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            "bestvideo+bestaudio/best".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            output.to_string_lossy().to_string(),
            "--".to_string(),
            url.to_string(),
        ]
    }

    pub async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        run_tool(TOOL, &self.yt_dlp_path, &Self::download_args(url, output), output).await
    }
}
