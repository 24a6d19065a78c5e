pub mod download;
pub mod extract;
pub mod health;

use crate::error::HttpAppError;
use vidkit_core::AppError;

/// A present, non-blank string field, or a 400 naming the field.
pub(crate) fn required_field<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, HttpAppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(HttpAppError::from(AppError::InvalidInput(format!(
            "Missing {}",
            name
        )))),
    }
}
