//! Shared types for the POS framework
//!
//! Common types used by the server and its terminal clients: error codes,
//! the HTTP response envelope, API request/response DTOs, the closed
//! role/station/status enums and the push-channel event types.

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{OrderEventKind, PushEnvelope};
pub use models::{OrderStatus, Role, Station};
pub use response::ApiResponse;
