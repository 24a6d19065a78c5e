//! Configuration validation
//!
//! `Config` already rejects malformed values while loading. These checks depend
//! on the deployment environment and run once more before anything is built.

use anyhow::Result;
use vidkit_core::{Config, StorageBackend, StorageCredential};

/// Validate settings that are only wrong in some environments.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.ffmpeg_path().trim().is_empty() {
        return Err(anyhow::anyhow!("FFMPEG_PATH cannot be empty"));
    }

    if config.yt_dlp_path().trim().is_empty() {
        return Err(anyhow::anyhow!("YT_DLP_PATH cannot be empty"));
    }

    if config.storage_backend() == StorageBackend::Supabase
        && config.supabase_key(StorageCredential::Anon).is_none()
    {
        tracing::warn!("SUPABASE_ANON_KEY not set - readiness probe will fail");
    }

    if is_production && config.storage_backend() == StorageBackend::Local {
        tracing::warn!("Local storage backend in production - objects live on this host only");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key: &str| map.get(key).cloned()).unwrap()
    }

    const LOCAL: &[(&str, &str)] = &[
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/vidkit-storage"),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/files"),
    ];

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut vars = LOCAL.to_vec();
        vars.push(("ENVIRONMENT", "production"));
        vars.push(("CORS_ORIGINS", "https://app.example.com,*"));
        let config = config_with(&vars);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("CORS"));
    }

    #[test]
    fn test_explicit_origins_accepted_in_production() {
        let mut vars = LOCAL.to_vec();
        vars.push(("ENVIRONMENT", "production"));
        vars.push(("CORS_ORIGINS", "https://app.example.com"));
        let config = config_with(&vars);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_wildcard_cors_allowed_in_development() {
        let config = config_with(LOCAL);
        assert!(validate_config(&config).is_ok());
    }
}
