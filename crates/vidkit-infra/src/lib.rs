//! Vidkit Infrastructure Library
//!
//! Shared infrastructure for the vidkit service:
//! - Middleware (request ID, request spans)
//! - Telemetry initialization
//! - Response envelopes

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId, RequestSpan};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, LogFormat};

pub use error::{ErrorResponse, SuccessResponse};
