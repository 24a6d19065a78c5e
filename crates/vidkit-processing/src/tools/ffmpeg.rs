//! FFmpeg invocations for audio and thumbnail extraction.

use super::command::{run_tool, validate_tool_path, ToolError};
use std::path::Path;

const TOOL: &str = "ffmpeg";

pub struct Ffmpeg {
    ffmpeg_path: String,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, ToolError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(TOOL, &ffmpeg_path)?;
        Ok(Self { ffmpeg_path })
    }

    /// Drop the video stream and encode audio as VBR MP3 (quality 2).
    pub fn audio_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            "libmp3lame".to_string(),
            "-q:a".to_string(),
            "2".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Grab the first frame as a JPEG.
    pub fn thumbnail_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-ss".to_string(),
            "00:00:00".to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    pub async fn extract_audio(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        run_tool(TOOL, &self.ffmpeg_path, &Self::audio_args(input, output), output).await
    }

    pub async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        run_tool(TOOL, &self.ffmpeg_path, &Self::thumbnail_args(input, output), output).await
    }
}
