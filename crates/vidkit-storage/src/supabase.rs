use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Supabase Storage REST client bound to a single API key.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Project URL, e.g. "https://xyz.supabase.co"
    /// * `api_key` - Anon or service-role key; decides what the client may do
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> StorageResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();

        if base_url.is_empty() {
            return Err(StorageError::ConfigError("SUPABASE_URL is empty".to_string()));
        }
        if api_key.is_empty() {
            return Err(StorageError::ConfigError("Supabase API key is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn object_url(&self, scope: Option<&str>, bucket: &str, key: &str) -> String {
        let path = encode_path(bucket, key);
        match scope {
            Some(scope) => format!("{}/storage/v1/object/{}/{}", self.base_url, scope, path),
            None => format!("{}/storage/v1/object/{}", self.base_url, path),
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Percent-encode each key segment, keeping `/` as the separator.
fn encode_path(bucket: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", urlencoding::encode(bucket), encoded_key)
}

/// Supabase reports a missing object either as 404 or as 400 with a
/// `not_found` error body.
fn is_not_found(status: StatusCode, body: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || (status == StatusCode::BAD_REQUEST
            && (body.contains("not_found") || body.contains("Object not found")))
}

/// HEAD responses carry no body, so a 400 cannot be told apart from a real
/// failure and only 404 means absent.
fn exists_from_status(status: StatusCode, bucket: &str, key: &str) -> StorageResult<bool> {
    if status.is_success() {
        return Ok(true);
    }
    if status == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    Err(StorageError::BackendError(format!(
        "Supabase returned {} for {}/{}",
        status, bucket, key
    )))
}

async fn error_body(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        validate_key(key)?;
        let start = std::time::Instant::now();
        let url = self.object_url(Some("authenticated"), bucket, key);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            if is_not_found(status, &body) {
                return Err(StorageError::NotFound(format!("{}/{}", bucket, key)));
            }
            tracing::error!(
                bucket = %bucket,
                key = %key,
                status = %status,
                body = %body,
                "Supabase download failed"
            );
            return Err(StorageError::DownloadFailed(format!(
                "Supabase returned {}: {}",
                status, body
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(format!("Failed to read body: {}", e)))?
            .to_vec();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase download successful"
        );

        Ok(data)
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> StorageResult<()> {
        validate_key(key)?;
        let start = std::time::Instant::now();
        let size = data.len();
        let url = self.object_url(None, bucket, key);

        let response = self
            .authorized(self.client.post(&url))
            .header("content-type", content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            tracing::error!(
                bucket = %bucket,
                key = %key,
                status = %status,
                body = %body,
                "Supabase upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "Supabase returned {}: {}",
                status, body
            )));
        }

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.object_url(Some("public"), bucket, key)
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let url = self.object_url(None, bucket, key);

        let response = self
            .authorized(self.client.head(&url))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(format!("Request failed: {}", e)))?;

        exists_from_status(response.status(), bucket, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
