//! HTTP request handlers for the extractor API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::events::TracingSink;
use crate::extraction::Extractor;
use crate::models::ExtractionRequest;

use super::request::ExtractRequestBody;
use super::response::{ApiError, ApiErrorResponse, ExtractResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/extract", post(extract_handler))
        .with_state(state)
}

fn error_response(status: StatusCode, error: ApiError) -> axum::response::Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

/// Handler for POST /extract endpoint.
///
/// Runs one extraction on the blocking pool and returns the expenses.
async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequestBody>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing extraction request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::validation_error(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return error_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let request = match ExtractionRequest::try_from(body) {
        Ok(request) => request,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid extraction request");
            let api_error: ApiErrorResponse = err.into();
            return error_response(api_error.status, api_error.error);
        }
    };

    let start_time = Instant::now();
    let executor = state.executor();
    let result = tokio::task::spawn_blocking(move || {
        Extractor::with_events(executor, TracingSink::with_correlation_id(correlation_id))
            .extract(&request)
    })
    .await;

    match result {
        Ok(Ok(outcome)) => {
            info!(
                correlation_id = %correlation_id,
                expenses = outcome.expenses.len(),
                orphaned_line_items = outcome.orphaned_line_items,
                duration_us = start_time.elapsed().as_micros(),
                "Extraction completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(ExtractResponse::new(correlation_id, outcome)),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Extraction failed"
            );
            let api_error: ApiErrorResponse = err.into();
            error_response(api_error.status, api_error.error)
        }
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Extraction task did not complete"
            );
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "Extraction task did not complete"),
            )
        }
    }
}
