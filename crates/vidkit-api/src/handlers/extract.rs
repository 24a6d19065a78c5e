use crate::error::{HttpAppError, ValidatedJson, ValidatedQuery};
use crate::handlers::required_field;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use vidkit_infra::{ErrorResponse, SuccessResponse};
use vidkit_processing::{AudioOutcome, ExtractOutcome, ExtractSelection, UrlAudioOutcome};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VideoIdRequest {
    /// Identifier of a video stored at `videos/{video_id}.mp4`
    pub video_id: Option<String>,
}

/// Artifact flags. A flag is set only by the literal `true` (or `1`).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExtractQuery {
    /// Extract the audio track as MP3
    pub audio: Option<String>,
    /// Extract the first frame as JPEG
    pub thumbnail: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    matches!(value.map(|v| v.trim().to_ascii_lowercase()).as_deref(), Some("true") | Some("1"))
}

impl ExtractQuery {
    pub fn selection(&self) -> ExtractSelection {
        ExtractSelection {
            audio: flag(self.audio.as_deref()),
            thumbnail: flag(self.thumbnail.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UrlAudioRequest {
    /// http(s) URL of a media file
    pub media_url: Option<String>,
    /// Storage key for the MP3; defaults to `audios/{sha256(media_url)}.mp3`
    pub upload_path: Option<String>,
}

#[utoipa::path(
    post,
    path = "/extract-audio",
    tag = "media",
    request_body = VideoIdRequest,
    responses(
        (status = 200, description = "Audio extracted and stored", body = AudioOutcome),
        (status = 400, description = "Missing or invalid video_id", body = ErrorResponse),
        (status = 404, description = "Video not found in storage", body = ErrorResponse),
        (status = 500, description = "Extraction or upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "extract_audio"))]
pub async fn extract_audio(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<VideoIdRequest>,
) -> Result<Json<SuccessResponse<AudioOutcome>>, HttpAppError> {
    let video_id = required_field(request.video_id.as_deref(), "video_id")?;

    let outcome = state.pipeline.extract_audio(video_id).await?;

    Ok(Json(
        SuccessResponse::new(outcome).with_message("Audio extracted and uploaded"),
    ))
}

#[utoipa::path(
    post,
    path = "/extract",
    tag = "media",
    request_body = VideoIdRequest,
    params(ExtractQuery),
    responses(
        (status = 200, description = "Requested artifacts extracted and stored", body = ExtractOutcome),
        (status = 400, description = "Missing video_id or no artifact requested", body = ErrorResponse),
        (status = 404, description = "Video not found in storage", body = ErrorResponse),
        (status = 500, description = "Extraction or upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query, request), fields(operation = "extract"))]
pub async fn extract(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ExtractQuery>,
    ValidatedJson(request): ValidatedJson<VideoIdRequest>,
) -> Result<Json<SuccessResponse<ExtractOutcome>>, HttpAppError> {
    let video_id = required_field(request.video_id.as_deref(), "video_id")?;

    let outcome = state.pipeline.extract(video_id, query.selection()).await?;

    Ok(Json(
        SuccessResponse::new(outcome).with_message("Extraction completed"),
    ))
}

#[utoipa::path(
    post,
    path = "/extract-audio/url",
    tag = "media",
    request_body = UrlAudioRequest,
    responses(
        (status = 200, description = "Audio extracted from the fetched media and stored", body = UrlAudioOutcome),
        (status = 400, description = "Missing or invalid media_url or upload_path", body = ErrorResponse),
        (status = 500, description = "Fetch, extraction or upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "extract_audio_from_url"))]
pub async fn extract_audio_from_url(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UrlAudioRequest>,
) -> Result<Json<SuccessResponse<UrlAudioOutcome>>, HttpAppError> {
    let media_url = required_field(request.media_url.as_deref(), "media_url")?;
    let upload_path = request
        .upload_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let outcome = state
        .pipeline
        .extract_audio_from_url(media_url, upload_path)
        .await?;

    Ok(Json(
        SuccessResponse::new(outcome).with_message("Audio extracted and uploaded"),
    ))
}
