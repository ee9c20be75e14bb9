//! Shared request and response types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType, INTERNAL_ERROR_MESSAGE};
pub use json::Json;
