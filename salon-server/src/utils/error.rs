//! Error handling re-exports
//!
//! The unified error system lives in `shared::error`; this module re-exports
//! it so handlers and repositories import from one place.

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
