//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::handlers;
use vidkit_infra::ErrorResponse;
use vidkit_processing::{AudioOutcome, DownloadOutcome, ExtractOutcome, UrlAudioOutcome};

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Successful responses wrap the documented payload as
/// `{success: true, data, error: null, message}`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidkit API",
        version = "0.1.0",
        description = "Video download and media extraction service. Videos are fetched with yt-dlp, \
                       transcoded with ffmpeg, and stored in a Supabase Storage bucket."
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::download::download_video,
        handlers::extract::extract_audio,
        handlers::extract::extract,
        handlers::extract::extract_audio_from_url,
    ),
    components(
        schemas(
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::download::DownloadRequest,
            handlers::extract::VideoIdRequest,
            handlers::extract::UrlAudioRequest,
            DownloadOutcome,
            AudioOutcome,
            ExtractOutcome,
            UrlAudioOutcome,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "media", description = "Video download, audio and thumbnail extraction")
    )
)]
pub struct ApiDoc;
