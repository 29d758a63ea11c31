//! Joining line items to their document headers.
//!
//! Headers are collected into a [`HeaderLookupBuilder`] in the order the ERP
//! returned them and frozen into a read-only [`HeaderLookup`]. When a document
//! number repeats, the later header replaces the earlier one and the
//! replacement is counted. [`reconcile`] then pairs every line item with its
//! header, keeping line-item order and setting aside orphans.

use std::collections::HashMap;

use crate::models::{HeaderRecord, LineItemRecord};

/// Collects headers before they are frozen into a [`HeaderLookup`].
#[derive(Debug, Default)]
pub struct HeaderLookupBuilder {
    headers: HashMap<String, HeaderRecord>,
    overwritten: Vec<String>,
}

impl HeaderLookupBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header. A header with an already seen document number
    /// replaces the earlier one.
    pub fn insert(&mut self, header: HeaderRecord) {
        let key = header.document_number.clone();
        if self.headers.insert(key.clone(), header).is_some() {
            self.overwritten.push(key);
        }
    }

    /// Finishes the build.
    pub fn freeze(self) -> HeaderLookup {
        HeaderLookup {
            headers: self.headers,
            overwritten: self.overwritten,
        }
    }
}

/// Read-only map from document number to header.
#[derive(Debug, Default)]
pub struct HeaderLookup {
    headers: HashMap<String, HeaderRecord>,
    overwritten: Vec<String>,
}

impl HeaderLookup {
    /// Builds a lookup from headers in ERP order; the last duplicate wins.
    ///
    /// # Example
    ///
    /// ```
    /// use erp_expense_extractor::extraction::HeaderLookup;
    /// use erp_expense_extractor::models::HeaderRecord;
    /// use chrono::NaiveDate;
    ///
    /// let header = |currency: &str| HeaderRecord {
    ///     document_number: "1".to_string(),
    ///     posting_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
    ///     document_currency: currency.to_string(),
    /// };
    ///
    /// let lookup = HeaderLookup::build(vec![header("USD"), header("EUR")]);
    /// assert_eq!(lookup.get("1").unwrap().document_currency, "EUR");
    /// assert_eq!(lookup.overwritten(), ["1"]);
    /// ```
    pub fn build(headers: impl IntoIterator<Item = HeaderRecord>) -> Self {
        let mut builder = HeaderLookupBuilder::new();
        for header in headers {
            builder.insert(header);
        }
        builder.freeze()
    }

    /// Finds the header of a document.
    pub fn get(&self, document_number: &str) -> Option<&HeaderRecord> {
        self.headers.get(document_number)
    }

    /// Document numbers whose header was replaced by a later duplicate,
    /// once per replacement.
    pub fn overwritten(&self) -> &[String] {
        &self.overwritten
    }
}

/// A line item together with the header of its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedLine<'a> {
    /// The owning document header.
    pub header: &'a HeaderRecord,
    /// The line item.
    pub line_item: LineItemRecord,
}

/// Result of joining line items to headers.
#[derive(Debug, Default)]
pub struct Reconciliation<'a> {
    /// Joined lines in line-item order.
    pub pairs: Vec<JoinedLine<'a>>,
    /// Document numbers of skipped line items, in line-item order.
    pub orphans: Vec<String>,
}

impl Reconciliation<'_> {
    /// Number of skipped line items.
    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }
}

/// Pairs each line item with its header.
///
/// Line items whose document has no header are skipped and listed in
/// `orphans`. Output order follows `line_items`.
pub fn reconcile<'a, I>(lookup: &'a HeaderLookup, line_items: I) -> Reconciliation<'a>
where
    I: IntoIterator<Item = LineItemRecord>,
{
    let mut reconciliation = Reconciliation::default();

    for line_item in line_items {
        match lookup.get(&line_item.document_number) {
            Some(header) => reconciliation.pairs.push(JoinedLine { header, line_item }),
            None => reconciliation.orphans.push(line_item.document_number),
        }
    }

    reconciliation
}
