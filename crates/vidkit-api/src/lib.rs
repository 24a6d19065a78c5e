//! Vidkit API Library
//!
//! HTTP handlers, error mapping, and application setup.

mod api_doc;
mod handlers;

pub mod error;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use state::AppState;
