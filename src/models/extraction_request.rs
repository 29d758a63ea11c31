//! Extraction request model.
//!
//! This module contains the [`ExtractionRequest`] type describing the
//! organizational scope of one extraction run.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{ExtractionError, ExtractionResult};

/// The scope of one extraction run.
///
/// Instances can only be built through [`ExtractionRequest::new`], which
/// enforces that the date range is ordered, the controlling area is set and at
/// least one cost center was requested. Cost centers keep their first-seen
/// order; repeated entries are dropped.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::models::ExtractionRequest;
/// use chrono::NaiveDate;
///
/// let request = ExtractionRequest::new(
///     "1000",
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     None,
///     ["0010", "0020", "0010"],
/// )
/// .unwrap();
///
/// assert_eq!(request.cost_centers(), ["0010", "0020"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRequest {
    controlling_area: String,
    from_time: NaiveDate,
    to_time: NaiveDate,
    period: Option<u32>,
    cost_centers: Vec<String>,
}

impl ExtractionRequest {
    /// Creates a validated extraction request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the controlling area is blank, if
    /// `from_time` is after `to_time`, or if no cost center was given.
    pub fn new<I, S>(
        controlling_area: impl Into<String>,
        from_time: NaiveDate,
        to_time: NaiveDate,
        period: Option<u32>,
        cost_centers: I,
    ) -> ExtractionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let controlling_area = controlling_area.into();
        if controlling_area.trim().is_empty() {
            return Err(ExtractionError::InvalidRequest {
                field: "controlling_area".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if from_time > to_time {
            return Err(ExtractionError::InvalidRequest {
                field: "from_time".to_string(),
                message: format!("{} is after to_time {}", from_time, to_time),
            });
        }

        let mut unique: Vec<String> = Vec::new();
        for cost_center in cost_centers {
            let cost_center = cost_center.into();
            if !unique.contains(&cost_center) {
                unique.push(cost_center);
            }
        }

        if unique.is_empty() {
            return Err(ExtractionError::InvalidRequest {
                field: "cost_centers".to_string(),
                message: "at least one cost center is required".to_string(),
            });
        }

        Ok(Self {
            controlling_area,
            from_time,
            to_time,
            period,
            cost_centers: unique,
        })
    }

    /// The controlling area to query.
    pub fn controlling_area(&self) -> &str {
        &self.controlling_area
    }

    /// First posting date included in the extraction.
    pub fn from_time(&self) -> NaiveDate {
        self.from_time
    }

    /// Last posting date included in the extraction.
    pub fn to_time(&self) -> NaiveDate {
        self.to_time
    }

    /// The accounting period, or `None` for all periods.
    pub fn period(&self) -> Option<u32> {
        self.period
    }

    /// The requested cost centers in first-seen order.
    pub fn cost_centers(&self) -> &[String] {
        &self.cost_centers
    }
}
