//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{id}.{ext}` where prefix and extension come from
//! [`MediaKind`]. URL-derived identifiers are the lowercase hex SHA-256 of the
//! exact URL string, with no normalization.

use crate::{StorageError, StorageResult};
use sha2::{Digest, Sha256};
use vidkit_core::constants::MAX_VIDEO_ID_LEN;
use vidkit_core::MediaKind;

/// SHA-256 of the input as 64 lowercase hex characters.
///
/// `"https://a/b"` and `"https://a/b/"` hash differently.
pub fn generate_media_hash(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Storage key for an artifact of `kind` named by `id`.
pub fn media_key(kind: MediaKind, id: &str) -> String {
    format!("{}/{}", kind.prefix(), kind.file_name(id))
}

/// `videos/{sha256(url)}.mp4`
pub fn video_key_for_url(url: &str) -> String {
    media_key(MediaKind::Video, &generate_media_hash(url))
}

/// `audios/{sha256(url)}.mp3`
pub fn audio_key_for_url(url: &str) -> String {
    media_key(MediaKind::Audio, &generate_media_hash(url))
}

/// Validate a caller-supplied video identifier.
///
/// Identifiers end up in storage keys and scratch file names, so only
/// `[A-Za-z0-9_.-]` is accepted and a leading `.` is refused.
pub fn validate_video_id(video_id: &str) -> StorageResult<()> {
    if video_id.is_empty() {
        return Err(StorageError::InvalidKey("video_id must not be empty".to_string()));
    }
    if video_id.len() > MAX_VIDEO_ID_LEN {
        return Err(StorageError::InvalidKey(format!(
            "video_id must be at most {} characters",
            MAX_VIDEO_ID_LEN
        )));
    }
    if video_id.starts_with('.') {
        return Err(StorageError::InvalidKey(
            "video_id must not start with '.'".to_string(),
        ));
    }
    if !video_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(StorageError::InvalidKey(
            "video_id may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a bucket-relative storage key.
///
/// Rejects empty keys, a leading `/`, empty segments and `.`/`..` segments.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key must not be empty".to_string()));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(StorageError::InvalidKey(format!(
                "Storage key has an invalid segment: {}",
                key
            )));
        }
    }
    Ok(())
}
