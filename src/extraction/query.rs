//! Remote query construction.
//!
//! This module turns an [`ExtractionRequest`] and its validated cost centers
//! into the [`RemoteQuerySpec`] understood by the ERP's controlling document
//! search.

use serde::{Deserialize, Serialize};

use crate::models::ExtractionRequest;
use crate::remote::ERP_DATE_FORMAT;

/// Name of the remote function searching controlling documents.
pub const DOCUMENT_FIND_FUNCTION: &str = "BAPI_ACC_CO_DOCUMENT_FIND";

/// Selection field holding the posting date.
pub const POSTING_DATE_FIELD: &str = "POSTGDATE";

/// Selection field holding the cost center.
pub const COST_CENTER_FIELD: &str = "KOSTL";

/// Whether matching rows are included or excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    /// Include matches (`I`).
    #[serde(rename = "I")]
    Include,
}

/// Comparison applied by a selection criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOption {
    /// `low <= value <= high` (`BT`).
    #[serde(rename = "BT")]
    Between,
    /// `value == low` (`EQ`).
    #[serde(rename = "EQ")]
    Equal,
}

/// One row of the remote `SELECT_CRITERIA` table.
///
/// The backend ORs criteria on the same field and ANDs across fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriterion {
    /// The field the criterion applies to.
    pub field: String,
    /// Include or exclude.
    pub sign: Sign,
    /// Comparison operator.
    pub option: SelectOption,
    /// Lower bound, or the value for `EQ`.
    pub low: String,
    /// Upper bound for `BT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<String>,
}

impl SelectionCriterion {
    /// Inclusive range criterion.
    pub fn between(field: &str, low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            sign: Sign::Include,
            option: SelectOption::Between,
            low: low.into(),
            high: Some(high.into()),
        }
    }

    /// Equality criterion.
    pub fn equal(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            sign: Sign::Include,
            option: SelectOption::Equal,
            low: value.into(),
            high: None,
        }
    }

    /// Checks whether `value` satisfies the criterion.
    ///
    /// Range bounds are compared as text, which orders `YYYYMMDD` dates
    /// chronologically.
    pub fn matches(&self, value: &str) -> bool {
        match self.option {
            SelectOption::Equal => value == self.low,
            SelectOption::Between => {
                let high = self.high.as_deref().unwrap_or(self.low.as_str());
                value >= self.low.as_str() && value <= high
            }
        }
    }
}

/// A fully specified controlling document search.
///
/// Built by [`build_request`]; two builds from equal input compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteQuerySpec {
    /// Remote function to call.
    pub function: String,
    /// Ask for line items (`RETURN_ITEMS`).
    pub return_items: bool,
    /// Ask for cost values (`RETURN_COSTS`).
    pub return_costs: bool,
    /// Controlling area (`DOCUMENT-CO_AREA`).
    pub controlling_area: String,
    /// Accounting period (`DOCUMENT-PERIOD`); `None` means all periods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Rows of `SELECT_CRITERIA`, in the order they are sent.
    pub selection_criteria: Vec<SelectionCriterion>,
}

impl RemoteQuerySpec {
    /// Criteria restricting the given field.
    pub fn criteria_for<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a SelectionCriterion> + 'a {
        self.selection_criteria
            .iter()
            .filter(move |c| c.field == field)
    }

    /// Checks a value against the criteria on `field`.
    ///
    /// Values pass when at least one criterion on the field matches, or when
    /// the field is not restricted at all.
    pub fn accepts(&self, field: &str, value: &str) -> bool {
        let mut restricted = false;
        for criterion in self.criteria_for(field) {
            if criterion.matches(value) {
                return true;
            }
            restricted = true;
        }
        !restricted
    }
}

/// Builds the document search for a request and its validated cost centers.
///
/// The posting date range comes first, followed by one equality criterion per
/// cost center in the order given.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::extraction::build_request;
/// use erp_expense_extractor::models::ExtractionRequest;
/// use chrono::NaiveDate;
///
/// let request = ExtractionRequest::new(
///     "1000",
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     None,
///     ["0010", "0020"],
/// )
/// .unwrap();
///
/// let spec = build_request(&request, request.cost_centers());
/// assert_eq!(spec.selection_criteria.len(), 3);
/// assert_eq!(spec.selection_criteria[0].low, "20240101");
/// assert_eq!(spec.selection_criteria[2].low, "0020");
/// ```
pub fn build_request(request: &ExtractionRequest, cost_centers: &[String]) -> RemoteQuerySpec {
    let mut selection_criteria = Vec::with_capacity(cost_centers.len() + 1);

    selection_criteria.push(SelectionCriterion::between(
        POSTING_DATE_FIELD,
        request.from_time().format(ERP_DATE_FORMAT).to_string(),
        request.to_time().format(ERP_DATE_FORMAT).to_string(),
    ));

    selection_criteria.extend(
        cost_centers
            .iter()
            .map(|cc| SelectionCriterion::equal(COST_CENTER_FIELD, cc.clone())),
    );

    RemoteQuerySpec {
        function: DOCUMENT_FIND_FUNCTION.to_string(),
        return_items: true,
        return_costs: true,
        controlling_area: request.controlling_area().to_string(),
        period: request.period(),
        selection_criteria,
    }
}
