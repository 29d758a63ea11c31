//! Response types for the extractor API.
//!
//! This module defines the success body of `/extract`, the error response
//! structure and the mapping from [`ExtractionError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExtractionError;
use crate::extraction::ExtractionOutcome;
use crate::models::Expense;

/// Success body of the `/extract` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Correlation ID of the request, as logged.
    pub correlation_id: Uuid,
    /// Extracted expenses in line-item order.
    pub expenses: Vec<Expense>,
    /// Line items skipped for lack of a header.
    pub orphaned_line_items: usize,
    /// Headers replaced by a later duplicate.
    pub overwritten_headers: usize,
}

impl ExtractResponse {
    /// Wraps an extraction outcome.
    pub fn new(correlation_id: Uuid, outcome: ExtractionOutcome) -> Self {
        Self {
            correlation_id,
            expenses: outcome.expenses,
            orphaned_line_items: outcome.orphaned_line_items,
            overwritten_headers: outcome.overwritten_headers,
        }
    }
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

impl From<ExtractionError> for ApiErrorResponse {
    fn from(error: ExtractionError) -> Self {
        let message = error.to_string();
        match error {
            ExtractionError::ConfigNotFound { .. } | ExtractionError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            ExtractionError::InvalidRequest { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
            ExtractionError::ScopeNotFound { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "SCOPE_NOT_FOUND",
                    message,
                    "Check the configured cost centers against the ERP",
                ),
            },
            ExtractionError::NoLineItems { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NO_LINE_ITEMS",
                    message,
                    "The ERP returned no line items for the requested scope",
                ),
            },
            ExtractionError::RemoteExecution { .. } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "REMOTE_EXECUTION_FAILED",
                    "There was a problem downloading data from the ERP",
                    message,
                ),
            },
            ExtractionError::MalformedRow { .. } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "MALFORMED_ROW",
                    "The ERP returned a row that could not be read",
                    message,
                ),
            },
        }
    }
}
