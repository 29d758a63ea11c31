//! Conversion of raw result rows into typed records.
//!
//! The ERP hands back tables whose cells are all text. This module maps the
//! backend's field names onto [`HeaderRecord`] and [`LineItemRecord`].

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, ExtractionResult};
use crate::models::{HeaderRecord, LineItemRecord};

use super::{DOC_HEADER_TABLE, LINE_ITEMS_TABLE};

/// Date format used by the backend for date fields and range values.
pub const ERP_DATE_FORMAT: &str = "%Y%m%d";

/// Header field names.
pub mod header_fields {
    /// Document number.
    pub const DOC_NO: &str = "DOC_NO";
    /// Posting date.
    pub const POSTGDATE: &str = "POSTGDATE";
    /// Controlling area currency.
    pub const CO_AREA_CURR: &str = "CO_AREA_CURR";
}

/// Line item field names.
pub mod line_item_fields {
    /// Document number.
    pub const DOC_NO: &str = "DOC_NO";
    /// Cost center.
    pub const COSTCENTER: &str = "COSTCENTER";
    /// Cost element.
    pub const COST_ELEM: &str = "COST_ELEM";
    /// Personnel number.
    pub const PERSON_NO: &str = "PERSON_NO";
    /// Order number.
    pub const ORDERID: &str = "ORDERID";
    /// Segment text.
    pub const SEG_TEXT: &str = "SEG_TEXT";
    /// Value in controlling area currency.
    pub const VALUE_COCUR: &str = "VALUE_COCUR";
}

/// One row of a remote result table: field name to text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the row for chaining.
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Returns the text of a field, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&HeaderRecord> for RawRow {
    fn from(header: &HeaderRecord) -> Self {
        RawRow::new()
            .with(header_fields::DOC_NO, header.document_number.clone())
            .with(
                header_fields::POSTGDATE,
                header.posting_date.format(ERP_DATE_FORMAT).to_string(),
            )
            .with(header_fields::CO_AREA_CURR, header.document_currency.clone())
    }
}

impl From<&LineItemRecord> for RawRow {
    fn from(item: &LineItemRecord) -> Self {
        RawRow::new()
            .with(line_item_fields::DOC_NO, item.document_number.clone())
            .with(line_item_fields::COSTCENTER, item.cost_center.clone())
            .with(line_item_fields::COST_ELEM, item.cost_element.clone())
            .with(line_item_fields::PERSON_NO, item.person_number.clone())
            .with(line_item_fields::ORDERID, item.order_id.clone())
            .with(line_item_fields::SEG_TEXT, item.segment_text.clone())
            .with(
                line_item_fields::VALUE_COCUR,
                item.value_in_company_currency.to_string(),
            )
    }
}

/// Locates a cell while converting one row.
struct RowReader<'a> {
    table: &'static str,
    index: usize,
    row: &'a RawRow,
}

impl<'a> RowReader<'a> {
    fn malformed(&self, field: &str, message: impl Into<String>) -> ExtractionError {
        ExtractionError::MalformedRow {
            table: self.table.to_string(),
            row: self.index,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// A field that must be present and non-blank.
    fn required(&self, field: &str) -> ExtractionResult<&'a str> {
        match self.row.get(field).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(self.malformed(field, "value is empty")),
            None => Err(self.malformed(field, "field is missing")),
        }
    }

    /// A field that may be missing; missing reads as empty text.
    fn optional(&self, field: &str) -> String {
        self.row
            .get(field)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Free text. Only the trailing blanks of the fixed-width field are cut.
    fn text(&self, field: &str) -> String {
        self.row
            .get(field)
            .map(|v| v.trim_end().to_string())
            .unwrap_or_default()
    }

    fn date(&self, field: &str) -> ExtractionResult<NaiveDate> {
        let value = self.required(field)?;
        parse_erp_date(value).ok_or_else(|| {
            self.malformed(
                field,
                format!("'{}' is not a YYYYMMDD or YYYY-MM-DD date", value),
            )
        })
    }

    fn amount(&self, field: &str) -> ExtractionResult<Decimal> {
        let value = self.required(field)?;
        parse_erp_amount(value)
            .ok_or_else(|| self.malformed(field, format!("'{}' is not a decimal amount", value)))
    }
}

/// Parses a backend date in `YYYYMMDD` or ISO `YYYY-MM-DD` form.
pub fn parse_erp_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, ERP_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

/// Parses a backend amount. A trailing minus sign marks a negative value.
pub fn parse_erp_amount(value: &str) -> Option<Decimal> {
    match value.strip_suffix('-') {
        Some(magnitude) => Decimal::from_str(magnitude.trim()).ok().map(|d| -d),
        None => Decimal::from_str(value).ok(),
    }
}

/// Converts the document header table.
///
/// # Errors
///
/// Returns `MalformedRow` for the first row missing its document number or
/// currency, or carrying an unparseable posting date.
pub fn parse_headers(rows: &[RawRow]) -> ExtractionResult<Vec<HeaderRecord>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let reader = RowReader {
                table: DOC_HEADER_TABLE,
                index,
                row,
            };
            Ok(HeaderRecord {
                document_number: reader.required(header_fields::DOC_NO)?.to_string(),
                posting_date: reader.date(header_fields::POSTGDATE)?,
                document_currency: reader.required(header_fields::CO_AREA_CURR)?.to_string(),
            })
        })
        .collect()
}

/// Converts the line item table.
///
/// # Errors
///
/// Returns `MalformedRow` for the first row without a document number, cost
/// center or cost element, or with an unparseable value.
pub fn parse_line_items(rows: &[RawRow]) -> ExtractionResult<Vec<LineItemRecord>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let reader = RowReader {
                table: LINE_ITEMS_TABLE,
                index,
                row,
            };
            Ok(LineItemRecord {
                document_number: reader.required(line_item_fields::DOC_NO)?.to_string(),
                cost_center: reader.required(line_item_fields::COSTCENTER)?.to_string(),
                cost_element: reader.required(line_item_fields::COST_ELEM)?.to_string(),
                person_number: reader.optional(line_item_fields::PERSON_NO),
                order_id: reader.optional(line_item_fields::ORDERID),
                segment_text: reader.text(line_item_fields::SEG_TEXT),
                value_in_company_currency: reader.amount(line_item_fields::VALUE_COCUR)?,
            })
        })
        .collect()
}
