//! Shared types for the Petala salon server
//!
//! Common types used across crates: the unified error system
//! (codes, categories, responses) and small utility helpers.

pub mod error;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
