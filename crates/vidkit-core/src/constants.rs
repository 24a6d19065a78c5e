//! Application-wide constants.

/// Bucket that holds every artifact when `STORAGE_BUCKET` is not set.
pub const DEFAULT_BUCKET: &str = "tmp_videos";

/// Scratch directory used when `TMP_DIR` is not set.
pub const DEFAULT_TMP_DIR: &str = "/tmp";

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

pub const DEFAULT_YT_DLP_PATH: &str = "yt-dlp";

/// JSON bodies are tiny; anything larger than this is rejected by the body limit layer.
pub const DEFAULT_MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Longest caller-supplied video identifier accepted.
pub const MAX_VIDEO_ID_LEN: usize = 128;
