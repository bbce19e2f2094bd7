//! Response types for the engine's HTTP API.
//!
//! This module defines the success views and the error response structures
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{ExpenseClaim, TravelAdvance};

/// Advance view: the record plus its base-currency display amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceView {
    /// The advance record.
    #[serde(flatten)]
    pub advance: TravelAdvance,
    /// The principal converted to the base currency for display.
    pub amount_sar: Decimal,
}

/// Claim view: the record plus the advisory violation count, which is
/// recomputed per response rather than persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimView {
    /// The claim record.
    #[serde(flatten)]
    pub claim: ExpenseClaim,
    /// Number of lines exceeding their category ceiling.
    pub violation_count: usize,
}

/// Response body for `POST /receipts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptView {
    /// Stable reference URL for the stored file.
    pub url: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Validation failed for '{}': {}", field, message),
                    "Correct the input and retry",
                ),
            },
            EngineError::StateTransition {
                entity,
                operation,
                current,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "STATE_TRANSITION_ERROR",
                    format!("Cannot {} a {} in state '{}'", operation, entity, current),
                    "The entity is not in the required predecessor state",
                ),
            },
            EngineError::Conflict {
                entity,
                id,
                expected,
                found,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "CONFLICT",
                    format!(
                        "Conflict on {} {}: expected state '{}', found '{}'",
                        entity, id, expected, found
                    ),
                    "The entity was modified concurrently; reload and retry",
                ),
            },
            EngineError::NotFound { kind, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", format!("{} not found: {}", kind, id)),
            },
            EngineError::Dependency {
                dependency,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "DEPENDENCY_ERROR",
                    format!("Dependency '{}' failed", dependency),
                    message,
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response: ApiErrorResponse =
            EngineError::validation("amount", "must be greater than zero").into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_state_transition_maps_to_conflict() {
        let response: ApiErrorResponse = EngineError::StateTransition {
            entity: "travel_advance".to_string(),
            operation: "settle".to_string(),
            current: "requested".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "STATE_TRANSITION_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response: ApiErrorResponse =
            EngineError::not_found("expense_claim", "claim_1").into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "NOT_FOUND");
    }

    #[test]
    fn test_dependency_maps_to_bad_gateway() {
        let response: ApiErrorResponse = EngineError::Dependency {
            dependency: "receipt_store".to_string(),
            message: "upload rejected".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(response.error.code, "DEPENDENCY_ERROR");
    }
}
