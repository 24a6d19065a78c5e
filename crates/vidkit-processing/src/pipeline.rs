//! Media pipeline orchestrator.
//!
//! Every operation runs the same linear sequence: acquire the source video,
//! derive the requested artifacts, persist them, then remove the request's
//! scratch directory. The first failing step aborts the operation; cleanup
//! runs regardless.

use crate::error::PipelineError;
use crate::scratch::ScratchDir;
use crate::tools::{parse_media_url, MediaTools};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;
use vidkit_core::MediaKind;
use vidkit_storage::keys::{
    audio_key_for_url, generate_media_hash, media_key, validate_key, validate_video_id,
};
use vidkit_storage::{Storage, StorageError};

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub video_path: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct AudioOutcome {
    pub audio_path: String,
    pub audio_url: String,
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UrlAudioOutcome {
    pub audio_path: String,
    pub audio_url: String,
}

/// Which artifacts `extract` should derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSelection {
    pub audio: bool,
    pub thumbnail: bool,
}

impl ExtractSelection {
    pub fn is_empty(&self) -> bool {
        !self.audio && !self.thumbnail
    }
}

/// A derived artifact waiting to be uploaded.
struct Derived {
    kind: MediaKind,
    path: PathBuf,
}

struct Persisted {
    kind: MediaKind,
    key: String,
    url: String,
}

pub struct MediaPipeline {
    storage: Arc<dyn Storage>,
    tools: Arc<dyn MediaTools>,
    bucket: String,
    tmp_dir: PathBuf,
}

impl MediaPipeline {
    /// `storage` must be the privileged client; every read and write goes through it.
    ///
    /// Each operation works in its own directory created under `tmp_dir`.
    pub fn new(
        storage: Arc<dyn Storage>,
        tools: Arc<dyn MediaTools>,
        bucket: impl Into<String>,
        tmp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            tools,
            bucket: bucket.into(),
            tmp_dir: tmp_dir.into(),
        }
    }

    /// Download `video_url` with the downloader and store it as `videos/{video_id}.mp4`.
    pub async fn download_from_url(
        &self,
        video_url: &str,
        video_id: &str,
    ) -> Result<DownloadOutcome, PipelineError> {
        parse_media_url(video_url)
            .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;
        check_video_id(video_id)?;

        let start = Instant::now();
        let result = match ScratchDir::create(&self.tmp_dir).await {
            Ok(scratch) => {
                let result = self
                    .download_from_url_inner(video_url, video_id, &scratch)
                    .await;
                scratch.close().await;
                result
            }
            Err(e) => Err(e.into()),
        };

        log_outcome("download", video_id, start, &result);
        result
    }

    async fn download_from_url_inner(
        &self,
        video_url: &str,
        video_id: &str,
        scratch: &ScratchDir,
    ) -> Result<DownloadOutcome, PipelineError> {
        let hash = generate_media_hash(video_url);
        let local = scratch.file(&MediaKind::Video.file_name(&hash));

        self.tools.download_video(video_url, &local).await?;

        let persisted = self
            .persist(MediaKind::Video, video_id, &local)
            .await?;

        Ok(DownloadOutcome {
            video_path: persisted.key,
        })
    }

    /// Extract the audio track of the stored `videos/{video_id}.mp4`.
    pub async fn extract_audio(&self, video_id: &str) -> Result<AudioOutcome, PipelineError> {
        check_video_id(video_id)?;

        let start = Instant::now();
        let result = match ScratchDir::create(&self.tmp_dir).await {
            Ok(scratch) => {
                let result = self.extract_audio_inner(video_id, &scratch).await;
                scratch.close().await;
                result
            }
            Err(e) => Err(e.into()),
        };

        log_outcome("extract_audio", video_id, start, &result);
        result
    }

    async fn extract_audio_inner(
        &self,
        video_id: &str,
        scratch: &ScratchDir,
    ) -> Result<AudioOutcome, PipelineError> {
        let source = self.stage_stored_video(video_id, scratch).await?;

        let audio = scratch.file(&MediaKind::Audio.file_name(video_id));
        self.tools.extract_audio(&source, &audio).await?;

        let persisted = self.persist(MediaKind::Audio, video_id, &audio).await?;
        Ok(AudioOutcome {
            audio_path: persisted.key,
            audio_url: persisted.url,
            video_id: video_id.to_string(),
        })
    }

    /// Derive the selected artifacts from the stored `videos/{video_id}.mp4`.
    ///
    /// All artifacts are derived before any is uploaded, and a failure anywhere
    /// fails the whole request.
    pub async fn extract(
        &self,
        video_id: &str,
        selection: ExtractSelection,
    ) -> Result<ExtractOutcome, PipelineError> {
        if selection.is_empty() {
            return Err(PipelineError::InvalidInput(
                "At least one of audio or thumbnail must be requested".to_string(),
            ));
        }
        check_video_id(video_id)?;

        let start = Instant::now();
        let result = match ScratchDir::create(&self.tmp_dir).await {
            Ok(scratch) => {
                let result = self.extract_inner(video_id, selection, &scratch).await;
                scratch.close().await;
                result
            }
            Err(e) => Err(e.into()),
        };

        log_outcome("extract", video_id, start, &result);
        result
    }

    async fn extract_inner(
        &self,
        video_id: &str,
        selection: ExtractSelection,
        scratch: &ScratchDir,
    ) -> Result<ExtractOutcome, PipelineError> {
        let source = self.stage_stored_video(video_id, scratch).await?;

        let mut derived = Vec::new();
        if selection.audio {
            let path = scratch.file(&MediaKind::Audio.file_name(video_id));
            self.tools.extract_audio(&source, &path).await?;
            derived.push(Derived {
                kind: MediaKind::Audio,
                path,
            });
        }
        if selection.thumbnail {
            let path = scratch.file(&MediaKind::Thumbnail.file_name(video_id));
            self.tools.extract_thumbnail(&source, &path).await?;
            derived.push(Derived {
                kind: MediaKind::Thumbnail,
                path,
            });
        }

        let mut outcome = ExtractOutcome {
            video_id: video_id.to_string(),
            audio_path: None,
            audio_url: None,
            thumbnail_path: None,
            thumbnail_url: None,
        };

        for artifact in derived {
            let persisted = self.persist(artifact.kind, video_id, &artifact.path).await?;
            match persisted.kind {
                MediaKind::Audio => {
                    outcome.audio_path = Some(persisted.key);
                    outcome.audio_url = Some(persisted.url);
                }
                MediaKind::Thumbnail => {
                    outcome.thumbnail_path = Some(persisted.key);
                    outcome.thumbnail_url = Some(persisted.url);
                }
                MediaKind::Video => {}
            }
        }

        Ok(outcome)
    }

    /// Fetch `media_url` over HTTP(S), extract its audio and store it at
    /// `upload_path`, or `audios/{sha256(media_url)}.mp3` when none is given.
    pub async fn extract_audio_from_url(
        &self,
        media_url: &str,
        upload_path: Option<&str>,
    ) -> Result<UrlAudioOutcome, PipelineError> {
        parse_media_url(media_url)
            .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;
        let key = match upload_path {
            Some(path) => {
                validate_key(path)?;
                path.to_string()
            }
            None => audio_key_for_url(media_url),
        };

        let start = Instant::now();
        let hash = generate_media_hash(media_url);
        let result = match ScratchDir::create(&self.tmp_dir).await {
            Ok(scratch) => {
                let result = self
                    .extract_audio_from_url_inner(media_url, &hash, &key, &scratch)
                    .await;
                scratch.close().await;
                result
            }
            Err(e) => Err(e.into()),
        };

        log_outcome("extract_audio_from_url", &hash, start, &result);
        result
    }

    async fn extract_audio_from_url_inner(
        &self,
        media_url: &str,
        hash: &str,
        key: &str,
        scratch: &ScratchDir,
    ) -> Result<UrlAudioOutcome, PipelineError> {
        let source = scratch.file(&MediaKind::Video.file_name(hash));
        let audio = scratch.file(&MediaKind::Audio.file_name(hash));

        self.tools.fetch_media(media_url, &source).await?;
        self.tools.extract_audio(&source, &audio).await?;

        let data = tokio::fs::read(&audio).await?;
        self.storage
            .upload(&self.bucket, key, data, MediaKind::Audio.content_type(), true)
            .await?;

        Ok(UrlAudioOutcome {
            audio_path: key.to_string(),
            audio_url: self.storage.public_url(&self.bucket, key),
        })
    }

    /// Download `videos/{video_id}.mp4` into the scratch directory.
    async fn stage_stored_video(
        &self,
        video_id: &str,
        scratch: &ScratchDir,
    ) -> Result<PathBuf, PipelineError> {
        let key = media_key(MediaKind::Video, video_id);
        let data = match self.storage.download(&self.bucket, &key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => {
                return Err(PipelineError::NotFound(format!(
                    "Video not found in storage: {}",
                    key
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let path = scratch.file(&MediaKind::Video.file_name(video_id));
        tokio::fs::write(&path, &data).await?;

        tracing::debug!(
            video_id = %video_id,
            key = %key,
            size_bytes = data.len(),
            "Staged source video"
        );

        Ok(path)
    }

    /// Upload a local artifact under its identifier key and resolve its public URL.
    async fn persist(
        &self,
        kind: MediaKind,
        id: &str,
        local: &Path,
    ) -> Result<Persisted, PipelineError> {
        let key = media_key(kind, id);
        let data = tokio::fs::read(local).await?;
        self.storage
            .upload(&self.bucket, &key, data, kind.content_type(), true)
            .await?;
        let url = self.storage.public_url(&self.bucket, &key);
        Ok(Persisted { kind, key, url })
    }
}

fn check_video_id(video_id: &str) -> Result<(), PipelineError> {
    validate_video_id(video_id).map_err(|e| match e {
        StorageError::InvalidKey(msg) => PipelineError::InvalidInput(msg),
        other => PipelineError::Storage(other),
    })
}

fn log_outcome<T>(
    operation: &str,
    id: &str,
    start: Instant,
    result: &Result<T, PipelineError>,
) {
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(_) => tracing::info!(
            operation = operation,
            video_id = %id,
            duration_ms = duration_ms,
            "Pipeline operation completed"
        ),
        Err(e) => tracing::warn!(
            operation = operation,
            video_id = %id,
            duration_ms = duration_ms,
            error = %e,
            "Pipeline operation failed"
        ),
    }
}
