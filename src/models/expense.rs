//! Canonical expense record.
//!
//! This module contains the [`Expense`] type handed to downstream reporting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Record type stamped on every expense read from controlling documents.
pub const ACTUAL_EXPENSE_TYPE: &str = "ACTUAL";

/// One expense derived from a controlling document line item.
///
/// Date and currency come from the document header; identifiers are stored
/// without leading zeros.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::models::{Expense, ACTUAL_EXPENSE_TYPE};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let expense = Expense {
///     date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
///     expense_type: ACTUAL_EXPENSE_TYPE.to_string(),
///     cost_center: "10".to_string(),
///     cost_element: "99".to_string(),
///     person_number: "123".to_string(),
///     order_id: "0".to_string(),
///     segment_text: "Travel".to_string(),
///     reserved: String::new(),
///     amount: Decimal::from_str("150.00").unwrap(),
///     currency: "EUR".to_string(),
///     document_number: "D1".to_string(),
/// };
/// assert_eq!(expense.expense_type, "ACTUAL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Posting date of the owning document.
    pub date: NaiveDate,
    /// Record type, always [`ACTUAL_EXPENSE_TYPE`] for ERP extractions.
    #[serde(rename = "type")]
    pub expense_type: String,
    /// Cost center without leading zeros.
    pub cost_center: String,
    /// Cost element without leading zeros.
    pub cost_element: String,
    /// Personnel number without leading zeros.
    pub person_number: String,
    /// Internal order without leading zeros.
    pub order_id: String,
    /// Free text of the line item.
    pub segment_text: String,
    /// Unused column kept for downstream layout compatibility. Always empty.
    pub reserved: String,
    /// Value in the controlling area currency.
    pub amount: Decimal,
    /// Currency of the owning document.
    pub currency: String,
    /// Document number without leading zeros.
    pub document_number: String,
}
