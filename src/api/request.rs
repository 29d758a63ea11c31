//! Request types for the extractor API.
//!
//! This module defines the JSON request structure for the `/extract` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::models::ExtractionRequest;

/// Request body for the `/extract` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequestBody {
    /// The controlling area to read from.
    pub controlling_area: String,
    /// First posting date (inclusive).
    pub from_time: NaiveDate,
    /// Last posting date (inclusive).
    pub to_time: NaiveDate,
    /// Optional accounting period.
    #[serde(default)]
    pub period: Option<u32>,
    /// Cost centers to extract.
    pub cost_centers: Vec<String>,
}

impl TryFrom<ExtractRequestBody> for ExtractionRequest {
    type Error = ExtractionError;

    fn try_from(body: ExtractRequestBody) -> Result<Self, Self::Error> {
        ExtractionRequest::new(
            body.controlling_area,
            body.from_time,
            body.to_time,
            body.period,
            body.cost_centers,
        )
    }
}
