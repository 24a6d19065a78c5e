use async_trait::async_trait;
use vidkit_storage::{Storage, StorageBackend, StorageError, StorageResult};

/// A backend that refuses every request, as an unreachable storage service would.
pub struct UnreachableStorage;

#[async_trait]
impl Storage for UnreachableStorage {
    async fn download(&self, _bucket: &str, _key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::BackendError("connection refused".to_string()))
    }

    async fn upload(
        &self,
        _bucket: &str,
        _key: &str,
        _data: Vec<u8>,
        _content_type: &str,
        _upsert: bool,
    ) -> StorageResult<()> {
        Err(StorageError::BackendError("connection refused".to_string()))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("http://unreachable.test/{}/{}", bucket, key)
    }

    async fn exists(&self, _bucket: &str, _key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError("connection refused".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
