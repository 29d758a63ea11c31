//! Field normalization of joined line items.

use crate::models::{ACTUAL_EXPENSE_TYPE, Expense};

use super::reconcile::JoinedLine;

/// Removes leading `'0'` characters from an identifier.
///
/// Interior and trailing zeros are kept. A value made only of zeros becomes
/// `"0"`; an empty value stays empty.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::extraction::strip_leading_zeros;
///
/// assert_eq!(strip_leading_zeros("00045"), "45");
/// assert_eq!(strip_leading_zeros("00000"), "0");
/// assert_eq!(strip_leading_zeros("450"), "450");
/// assert_eq!(strip_leading_zeros(""), "");
/// ```
pub fn strip_leading_zeros(value: &str) -> &str {
    let stripped = value.trim_start_matches('0');
    if stripped.is_empty() && !value.is_empty() {
        &value[value.len() - 1..]
    } else {
        stripped
    }
}

/// Builds the canonical expense for a joined line item.
///
/// Date and currency are taken from the header. Cost center, cost element,
/// person number, order ID and document number lose their leading zeros.
pub fn normalize(pair: JoinedLine<'_>) -> Expense {
    let JoinedLine { header, line_item } = pair;

    Expense {
        date: header.posting_date,
        expense_type: ACTUAL_EXPENSE_TYPE.to_string(),
        cost_center: strip_leading_zeros(&line_item.cost_center).to_string(),
        cost_element: strip_leading_zeros(&line_item.cost_element).to_string(),
        person_number: strip_leading_zeros(&line_item.person_number).to_string(),
        order_id: strip_leading_zeros(&line_item.order_id).to_string(),
        segment_text: line_item.segment_text,
        reserved: String::new(),
        amount: line_item.value_in_company_currency,
        currency: header.document_currency.clone(),
        document_number: strip_leading_zeros(&line_item.document_number).to_string(),
    }
}
