//! Media artifact kinds and their storage conventions.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// The kinds of object the pipeline stores.
///
/// Each kind fixes the key prefix, file extension and content type, so a
/// storage path is fully determined by the kind and the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    Thumbnail,
}

impl MediaKind {
    /// Bucket-relative directory for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaKind::Video => "videos",
            MediaKind::Audio => "audios",
            MediaKind::Thumbnail => "thumbnails",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Video => "mp4",
            MediaKind::Audio => "mp3",
            MediaKind::Thumbnail => "jpg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mpeg",
            MediaKind::Thumbnail => "image/jpeg",
        }
    }

    /// File name for an identifier, e.g. `abc.mp3`.
    pub fn file_name(&self, id: &str) -> String {
        format!("{}.{}", id, self.extension())
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Thumbnail => write!(f, "thumbnail"),
        }
    }
}
