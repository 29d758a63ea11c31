//! HTTP API module for the ERP expense extractor.
//!
//! This module provides the REST endpoint that runs an extraction and
//! returns the canonical expenses as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ExtractRequestBody;
pub use response::{ApiError, ApiErrorResponse, ExtractResponse};
pub use state::AppState;
