#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-supabase")]
use crate::SupabaseStorage;
use crate::{Storage, StorageBackend, StorageCredential, StorageError, StorageResult};
use std::sync::Arc;
use vidkit_core::Config;

/// Create a storage client for the configured backend, bound to `credential`.
///
/// The Supabase backend needs the key for the requested credential; the local
/// backend has no notion of credentials and ignores it.
pub async fn create_storage(
    config: &Config,
    credential: StorageCredential,
) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-supabase")]
        StorageBackend::Supabase => {
            let url = config.supabase_url().ok_or_else(|| {
                StorageError::ConfigError("SUPABASE_URL not configured".to_string())
            })?;
            let key = config.supabase_key(credential).ok_or_else(|| {
                StorageError::ConfigError(format!("Supabase {} key not configured", credential))
            })?;

            let storage = SupabaseStorage::new(url, key)?;
            tracing::debug!(credential = %credential, "Supabase storage client created");
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-supabase"))]
        StorageBackend::Supabase => Err(StorageError::ConfigError(
            "Supabase storage backend not available (storage-supabase feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url.to_string()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key: &str| map.get(key).cloned()).unwrap()
    }

    #[cfg(feature = "storage-supabase")]
    #[tokio::test]
    async fn test_missing_anon_key_is_config_error() {
        let config = config(&[
            ("SUPABASE_URL", "https://xyz.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]);

        let privileged = create_storage(&config, StorageCredential::ServiceRole).await;
        assert!(privileged.is_ok());

        let restricted = create_storage(&config, StorageCredential::Anon).await;
        assert!(matches!(restricted, Err(StorageError::ConfigError(_))));
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_local_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let config = config(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", path.as_str()),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/storage"),
        ]);

        let storage = create_storage(&config, StorageCredential::Anon).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }
}
