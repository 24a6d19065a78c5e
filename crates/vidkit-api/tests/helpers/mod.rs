#![allow(dead_code)]

//! Test helpers: build the router against local storage and fake tools.
//!
//! Run from workspace root: `cargo test -p vidkit-api`.

pub mod storage;
pub mod tools;

use axum_test::TestServer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vidkit_api::setup::build_app;
use vidkit_core::Config;
use vidkit_storage::{LocalStorage, Storage};

pub use tools::FakeTools;

pub const BUCKET: &str = "tmp_videos";
pub const BASE_URL: &str = "http://files.test";

/// Test application: server plus the directories and fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub tools: Arc<FakeTools>,
    pub scratch_dir: TempDir,
    pub _storage_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Put an object straight into the bucket.
    pub async fn store(&self, key: &str, data: &[u8]) {
        self.storage
            .upload(BUCKET, key, data.to_vec(), "application/octet-stream", true)
            .await
            .unwrap();
    }

    pub async fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.storage.download(BUCKET, key).await.ok()
    }

    /// Every regular file left under the scratch directory.
    pub fn scratch_files(&self) -> Vec<PathBuf> {
        files_under(self.scratch_dir.path())
    }
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

pub fn test_config(storage_dir: &Path, scratch_dir: &Path) -> Config {
    let vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "local".to_string()),
        ("LOCAL_STORAGE_PATH", storage_dir.display().to_string()),
        ("LOCAL_STORAGE_BASE_URL", BASE_URL.to_string()),
        ("STORAGE_BUCKET", BUCKET.to_string()),
        ("TMP_DIR", scratch_dir.display().to_string()),
        ("MAX_REQUEST_BODY_BYTES", "4096".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    Config::from_lookup(move |key: &str| vars.get(key).cloned()).unwrap()
}

/// Setup a test app whose readiness probe uses the same local storage.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeTools::default(), RestrictedStorage::Same).await
}

pub enum RestrictedStorage {
    Same,
    Missing,
    Custom(Arc<dyn Storage>),
}

pub async fn setup_test_app_with(tools: FakeTools, restricted: RestrictedStorage) -> TestApp {
    let storage_dir = tempfile::tempdir().unwrap();
    let scratch_dir = tempfile::tempdir().unwrap();
    let config = test_config(storage_dir.path(), scratch_dir.path());

    let storage = Arc::new(
        LocalStorage::new(storage_dir.path(), BASE_URL.to_string())
            .await
            .unwrap(),
    );
    let tools = Arc::new(tools);

    let restricted: Option<Arc<dyn Storage>> = match restricted {
        RestrictedStorage::Same => Some(storage.clone()),
        RestrictedStorage::Missing => None,
        RestrictedStorage::Custom(storage) => Some(storage),
    };

    let (_state, router) = build_app(config, storage.clone(), tools.clone(), restricted).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        storage,
        tools,
        scratch_dir,
        _storage_dir: storage_dir,
    }
}
