//! Configuration module
//!
//! Configuration is read once at start-up, validated, and then handed by
//! reference to everything that needs it. Nothing reads the environment after
//! `Config::from_env` returns.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_FFMPEG_PATH, DEFAULT_MAX_REQUEST_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_TMP_DIR, DEFAULT_YT_DLP_PATH,
};
use crate::storage_types::{StorageBackend, StorageCredential};

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_request_body_bytes: usize,
    /// "pretty" or "json"
    pub log_format: String,
}

/// Storage, scratch space and external tool settings
#[derive(Clone)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    pub storage_backend: StorageBackend,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub storage_bucket: String,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub tmp_dir: PathBuf,
    pub ffmpeg_path: String,
    pub yt_dlp_path: String,
}

impl Debug for PipelineConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("PipelineConfig")
            .field("base", &self.base)
            .field("storage_backend", &self.storage_backend)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &redact(&self.supabase_anon_key))
            .field(
                "supabase_service_role_key",
                &redact(&self.supabase_service_role_key),
            )
            .field("storage_bucket", &self.storage_bucket)
            .field("local_storage_path", &self.local_storage_path)
            .field("local_storage_base_url", &self.local_storage_base_url)
            .field("tmp_dir", &self.tmp_dir)
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("yt_dlp_path", &self.yt_dlp_path)
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.as_pipeline().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = PipelineConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_pipeline().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_pipeline().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_pipeline().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_pipeline().base.environment
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.as_pipeline().base.max_request_body_bytes
    }

    pub fn log_format(&self) -> &str {
        &self.as_pipeline().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_pipeline().storage_backend
    }

    pub fn supabase_url(&self) -> Option<&str> {
        self.as_pipeline().supabase_url.as_deref()
    }

    /// Key for the requested credential mode, if configured.
    pub fn supabase_key(&self, credential: StorageCredential) -> Option<&str> {
        match credential {
            StorageCredential::Anon => self.as_pipeline().supabase_anon_key.as_deref(),
            StorageCredential::ServiceRole => {
                self.as_pipeline().supabase_service_role_key.as_deref()
            }
        }
    }

    pub fn storage_bucket(&self) -> &str {
        &self.as_pipeline().storage_bucket
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_pipeline().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_pipeline().local_storage_base_url.as_deref()
    }

    pub fn tmp_dir(&self) -> &PathBuf {
        &self.as_pipeline().tmp_dir
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_pipeline().ffmpeg_path
    }

    pub fn yt_dlp_path(&self) -> &str {
        &self.as_pipeline().yt_dlp_path
    }
}

fn is_production_environment(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

/// Treat empty values as unset so `KEY=` in a .env file does not count as configured.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl PipelineConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = get("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_environment(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match get("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let max_request_body_bytes = match get("MAX_REQUEST_BODY_BYTES") {
            Some(limit) => limit
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_REQUEST_BODY_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_REQUEST_BODY_BYTES,
        };

        let log_format = get("LOG_FORMAT")
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "pretty".to_string());

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
            max_request_body_bytes,
            log_format,
        };

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::Supabase,
        };

        let config = PipelineConfig {
            base,
            storage_backend,
            supabase_url: get("SUPABASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            supabase_anon_key: get("SUPABASE_ANON_KEY"),
            supabase_service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
            storage_bucket: get("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            local_storage_path: get("LOCAL_STORAGE_PATH"),
            local_storage_base_url: get("LOCAL_STORAGE_BASE_URL"),
            tmp_dir: PathBuf::from(get("TMP_DIR").unwrap_or_else(|| DEFAULT_TMP_DIR.to_string())),
            ffmpeg_path: get("FFMPEG_PATH").unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string()),
            yt_dlp_path: get("YT_DLP_PATH").unwrap_or_else(|| DEFAULT_YT_DLP_PATH.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.log_format != "pretty" && self.base.log_format != "json" {
            return Err(anyhow::anyhow!("LOG_FORMAT must be either 'pretty' or 'json'"));
        }

        if self.base.max_request_body_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_BODY_BYTES cannot be 0"));
        }

        if self.storage_bucket.contains('/') {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must not contain '/'"));
        }

        match self.storage_backend {
            StorageBackend::Supabase => {
                let url = self.supabase_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("SUPABASE_URL must be set when using the supabase storage backend")
                })?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(anyhow::anyhow!("SUPABASE_URL must be an http(s) URL"));
                }
                // Every pipeline path needs the privileged client, so its absence is fatal here.
                // The restricted key is only checked by the code path that uses it.
                if self.supabase_service_role_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_SERVICE_ROLE_KEY must be set when using the supabase storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn supabase_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SUPABASE_URL", "https://project.supabase.co/"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&supabase_env())).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.storage_backend(), StorageBackend::Supabase);
        assert_eq!(config.storage_bucket(), "tmp_videos");
        assert_eq!(config.tmp_dir(), &PathBuf::from("/tmp"));
        assert_eq!(config.ffmpeg_path(), "ffmpeg");
        assert_eq!(config.yt_dlp_path(), "yt-dlp");
        assert_eq!(config.cors_origins(), &["*".to_string()]);
        assert_eq!(config.log_format(), "pretty");
        assert!(!config.is_production());
        // Trailing slash is trimmed so URLs can be joined safely
        assert_eq!(config.supabase_url(), Some("https://project.supabase.co"));
    }

    #[test]
    fn test_missing_service_role_key_is_fatal() {
        let result = Config::from_lookup(lookup_from(&[(
            "SUPABASE_URL",
            "https://project.supabase.co",
        )]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("SUPABASE_SERVICE_ROLE_KEY"));
    }

    #[test]
    fn test_missing_anon_key_is_tolerated_at_startup() {
        let config = Config::from_lookup(lookup_from(&supabase_env())).unwrap();
        assert_eq!(config.supabase_key(StorageCredential::Anon), None);
        assert_eq!(
            config.supabase_key(StorageCredential::ServiceRole),
            Some("service-key")
        );
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let mut env = supabase_env();
        env.push(("SUPABASE_ANON_KEY", "  "));
        env.push(("PORT", ""));
        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.supabase_key(StorageCredential::Anon), None);
        assert_eq!(config.server_port(), 3000);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut env = supabase_env();
        env.push(("PORT", "not-a-port"));
        assert!(Config::from_lookup(lookup_from(&env)).is_err());
    }

    #[test]
    fn test_invalid_body_limit_rejected() {
        for value in ["10MB", "-1", "1.5"] {
            let mut env = supabase_env();
            env.push(("MAX_REQUEST_BODY_BYTES", value));
            let err = Config::from_lookup(lookup_from(&env)).unwrap_err().to_string();
            assert!(err.contains("MAX_REQUEST_BODY_BYTES"), "{}", value);
        }

        let mut env = supabase_env();
        env.push(("MAX_REQUEST_BODY_BYTES", "2048"));
        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.max_request_body_bytes(), 2048);
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut env = supabase_env();
        env.push(("ENVIRONMENT", "production"));
        assert!(Config::from_lookup(lookup_from(&env)).is_err());

        env.push(("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"));
        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn test_local_backend_requires_paths() {
        let env = [("STORAGE_BACKEND", "local")];
        assert!(Config::from_lookup(lookup_from(&env)).is_err());

        let env = [
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/vidkit"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/media"),
        ];
        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.local_storage_path(), Some("/var/lib/vidkit"));
    }

    #[test]
    fn test_invalid_log_format_rejected() {
        let mut env = supabase_env();
        env.push(("LOG_FORMAT", "xml"));
        assert!(Config::from_lookup(lookup_from(&env)).is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let mut env = supabase_env();
        env.push(("SUPABASE_ANON_KEY", "anon-secret"));
        let config = Config::from_lookup(lookup_from(&env)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("service-key"));
        assert!(!rendered.contains("anon-secret"));
    }
}
