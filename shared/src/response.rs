//! API Response types
//!
//! Every JSON response uses the same envelope:
//!
//! ```json
//! { "status": "success", "data": { ... } }
//! { "status": "error", "code": 4001, "message": "Order not found" }
//! ```

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Envelope discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// "success" or "error"
    pub status: ResponseStatus,
    /// Numeric error code (absent on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message (absent on plain success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on some failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: None,
            message: None,
            data: Some(data),
            details: None,
        }
    }

    /// Create a success response with a message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: None,
            message: Some(message.into()),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Success,
            code: None,
            message: None,
            data: None,
            details: None,
        }
    }

    /// Create an error response from code and message
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: Some(code.code()),
            message: Some(message.into()),
            data: None,
            details: None,
        }
    }

    /// Create an error response carrying structured details
    pub fn error_with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: Option<HashMap<String, Value>>,
    ) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: Some(code.code()),
            message: Some(message.into()),
            data: None,
            details,
        }
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match self.code {
            None => http::StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialize() {
        let response = ApiResponse::success(42);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"data\":42"));
        assert!(!json.contains("\"code\""));
    }

    #[test]
    fn test_error_serialize() {
        let response = ApiResponse::error(ErrorCode::OrderNotFound, "Order not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"code\":4001"));
        assert!(json.contains("\"message\":\"Order not found\""));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"status":"success","data":[1,2,3]}"#;
        let response: ApiResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.data, Some(vec![1, 2, 3]));
    }
}
