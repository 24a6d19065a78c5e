//! Vidkit Storage Library
//!
//! This crate provides the object storage gateway: the `Storage` trait, a
//! Supabase Storage backend, and a local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are bucket-relative and deterministic for a given identifier and media kind:
//!
//! - `videos/{id}.mp4`
//! - `audios/{id}.mp3`
//! - `thumbnails/{id}.jpg`
//!
//! where `{id}` is either a caller-supplied video identifier or the SHA-256 hex
//! digest of a source URL. Keys must not contain `..`, empty segments or a
//! leading `/`. Key generation is centralized in the `keys` module so all
//! backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-supabase")]
pub mod supabase;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-supabase")]
pub use supabase::SupabaseStorage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidkit_core::{StorageBackend, StorageCredential};
