//! Controlling document records returned by the ERP.
//!
//! A controlling document consists of one [`HeaderRecord`] and any number of
//! [`LineItemRecord`]s sharing its document number.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header of a controlling document.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::models::HeaderRecord;
/// use chrono::NaiveDate;
///
/// let header = HeaderRecord {
///     document_number: "0100000001".to_string(),
///     posting_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
///     document_currency: "EUR".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    /// The document number (key).
    pub document_number: String,
    /// The posting date of the document.
    pub posting_date: NaiveDate,
    /// The currency the document's values are expressed in.
    pub document_currency: String,
}

/// A single line item of a controlling document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// The document number of the owning header.
    pub document_number: String,
    /// The cost center the value is posted to.
    pub cost_center: String,
    /// The cost element of the posting.
    pub cost_element: String,
    /// The personnel number, if any.
    #[serde(default)]
    pub person_number: String,
    /// The internal order, if any.
    #[serde(default)]
    pub order_id: String,
    /// Free text of the line item.
    #[serde(default)]
    pub segment_text: String,
    /// Value in the controlling area currency.
    pub value_in_company_currency: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_item_deserialization_defaults_optional_text() {
        let json = r#"{
            "document_number": "D1",
            "cost_center": "0010",
            "cost_element": "0099",
            "value_in_company_currency": "150.00"
        }"#;

        let item: LineItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(item.person_number, "");
        assert_eq!(item.order_id, "");
        assert_eq!(item.segment_text, "");
        assert_eq!(
            item.value_in_company_currency,
            Decimal::from_str("150.00").unwrap()
        );
    }

    #[test]
    fn test_header_serialization_uses_iso_date() {
        let header = HeaderRecord {
            document_number: "D1".to_string(),
            posting_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            document_currency: "EUR".to_string(),
        };

        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["posting_date"], "2024-01-05");
    }
}
