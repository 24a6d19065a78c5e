//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` (pipeline and storage errors included) renders as
//! the `{success: false, data: null, error, code}` envelope with the status
//! from its `ErrorMetadata`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use vidkit_core::{AppError, ErrorMetadata, LogLevel};
use vidkit_infra::ErrorResponse;
use vidkit_processing::PipelineError;
use vidkit_storage::StorageError;

static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// Include the error chain in responses. Set once at start-up from the environment;
/// production keeps it off. Sensitive errors never carry details.
pub fn set_expose_error_details(expose: bool) {
    EXPOSE_ERROR_DETAILS.store(expose, Ordering::Relaxed);
}

/// `AppError` lives in vidkit-core, so the response impl goes on this wrapper.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            other => AppError::Storage(other.to_string()),
        };
        HttpAppError(app)
    }
}

/// Convert JSON body deserialization failures into a 400 with our envelope.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(rejection.body_text()));
        }
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for HttpAppError {
    fn from(rejection: QueryRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid query string: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our error envelope (400) on any rejection,
/// including a missing `Content-Type`.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

/// Query string extractor with the same rejection behaviour as [`ValidatedJson`].
#[derive(Debug, Clone, Copy)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(inner) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedQuery(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                code = code,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
        if EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed) && !app_error.is_sensitive() {
            body = body.with_details(app_error.detailed_message());
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_mapping() {
        let err = HttpAppError::from(StorageError::NotFound("b/videos/a.mp4".to_string()));
        assert_eq!(err.0.http_status_code(), 404);

        let err = HttpAppError::from(StorageError::InvalidKey("bad".to_string()));
        assert_eq!(err.0.http_status_code(), 400);

        let err = HttpAppError::from(StorageError::UploadFailed("503".to_string()));
        assert_eq!(err.0.error_code(), "STORAGE_ERROR");

        let err = HttpAppError::from(StorageError::ConfigError("no key".to_string()));
        assert_eq!(err.0.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_into_response_status() {
        let response =
            HttpAppError::from(AppError::InvalidInput("video_id is required".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = HttpAppError::from(AppError::ToolExecution("ffmpeg failed".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sensitive_errors_never_expose_details() {
        set_expose_error_details(true);

        let response = HttpAppError::from(AppError::Configuration(
            "SUPABASE_ANON_KEY is not set".to_string(),
        ))
        .into_response();
        let body = body_json(response).await;
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
        assert!(body.get("details").is_none());
        assert!(!body.to_string().contains("SUPABASE_ANON_KEY"));

        let response =
            HttpAppError::from(AppError::NotFound("videos/abc.mp4".to_string())).into_response();
        let body = body_json(response).await;
        assert!(body["details"].as_str().unwrap().contains("videos/abc.mp4"));
    }
}
