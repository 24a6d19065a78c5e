use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::required_field;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidkit_infra::{ErrorResponse, SuccessResponse};
use vidkit_processing::DownloadOutcome;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Page or media URL understood by yt-dlp (http or https)
    pub video_url: Option<String>,
    /// Identifier the video is stored under: `videos/{video_id}.mp4`
    pub video_id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/download",
    tag = "media",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Video downloaded and stored", body = DownloadOutcome),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Download or upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "download"))]
pub async fn download_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DownloadRequest>,
) -> Result<Json<SuccessResponse<DownloadOutcome>>, HttpAppError> {
    let video_url = required_field(request.video_url.as_deref(), "video_url")?;
    let video_id = required_field(request.video_id.as_deref(), "video_id")?;

    let outcome = state
        .pipeline
        .download_from_url(video_url, video_id)
        .await?;

    Ok(Json(
        SuccessResponse::new(outcome).with_message("Video downloaded and uploaded successfully"),
    ))
}
