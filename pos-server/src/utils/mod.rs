//! Utility module - error re-exports and logging

pub mod logger;

// Unified error types come from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use shared::response::ApiResponse;
