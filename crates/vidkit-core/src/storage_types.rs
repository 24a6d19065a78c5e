use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Defined in core because configuration selects the backend before the
/// storage crate builds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Supabase,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(StorageBackend::Supabase),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Supabase => write!(f, "supabase"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Which credential a storage client authenticates with.
///
/// `Anon` is the restricted key subject to per-object access rules;
/// `ServiceRole` bypasses them and is what the media pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCredential {
    Anon,
    ServiceRole,
}

impl Display for StorageCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageCredential::Anon => write!(f, "anon"),
            StorageCredential::ServiceRole => write!(f, "service_role"),
        }
    }
}
