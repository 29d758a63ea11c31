//! In-memory ERP stand-in.
//!
//! [`StaticExecutor`] answers from fixed tables, applying the date and cost
//! center criteria of each query the way the backend does. Line items of a
//! document whose header lies outside the date range are not returned. Line
//! items without any header row are, so fixtures can model orphans. The
//! period is not applied. Every query received is recorded.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;

use crate::error::{ExtractionError, ExtractionResult};
use crate::extraction::{COST_CENTER_FIELD, POSTING_DATE_FIELD, RemoteQuerySpec};
use crate::models::{HeaderRecord, LineItemRecord};

use super::{
    ERP_DATE_FORMAT, RawRow, RemoteError, RemoteQueryExecutor, RemoteTables, header_fields,
    line_item_fields, parse_erp_date,
};

/// Fixture file layout.
#[derive(Debug, Deserialize)]
struct Fixture {
    known_cost_centers: BTreeSet<String>,
    #[serde(flatten)]
    tables: RemoteTables,
}

/// A [`RemoteQueryExecutor`] serving fixed tables.
#[derive(Debug, Default)]
pub struct StaticExecutor {
    known_cost_centers: BTreeSet<String>,
    tables: RemoteTables,
    lookup_failure: Option<RemoteError>,
    execute_failure: Option<RemoteError>,
    issued: Mutex<Vec<RemoteQuerySpec>>,
    lookups: AtomicUsize,
}

impl StaticExecutor {
    /// Creates an executor from known cost centers and raw tables.
    pub fn new<I, S>(known_cost_centers: I, tables: RemoteTables) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_cost_centers: known_cost_centers.into_iter().map(Into::into).collect(),
            tables,
            ..Self::default()
        }
    }

    /// Creates an executor from typed records.
    pub fn with_documents<I, S>(
        known_cost_centers: I,
        headers: &[HeaderRecord],
        line_items: &[LineItemRecord],
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables = RemoteTables {
            doc_headers: headers.iter().map(RawRow::from).collect(),
            line_items: line_items.iter().map(RawRow::from).collect(),
        };
        Self::new(known_cost_centers, tables)
    }

    /// Loads an executor from a YAML fixture.
    ///
    /// ```yaml
    /// known_cost_centers: ["0010"]
    /// doc_headers:
    ///   - { DOC_NO: "D1", POSTGDATE: "20240105", CO_AREA_CURR: "EUR" }
    /// line_items:
    ///   - { DOC_NO: "D1", COSTCENTER: "0010", VALUE_COCUR: "150.00" }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not a valid fixture.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ExtractionResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ExtractionError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let fixture: Fixture =
            serde_yaml::from_str(&content).map_err(|e| ExtractionError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self::new(fixture.known_cost_centers, fixture.tables))
    }

    /// Makes every cost center lookup fail with `message`.
    pub fn fail_lookup(mut self, message: impl Into<String>) -> Self {
        self.lookup_failure = Some(RemoteError::new(message));
        self
    }

    /// Makes every document search fail with `message`.
    pub fn fail_execute(mut self, message: impl Into<String>) -> Self {
        self.execute_failure = Some(RemoteError::new(message));
        self
    }

    /// Document searches received so far, oldest first.
    pub fn issued_queries(&self) -> Vec<RemoteQuerySpec> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of cost center lookups received so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn header_selected(query: &RemoteQuerySpec, row: &RawRow) -> bool {
        // Rows with unreadable dates are passed through for the parser to reject.
        match row.get(header_fields::POSTGDATE).and_then(parse_erp_date) {
            Some(date) => query.accepts(
                POSTING_DATE_FIELD,
                &date.format(ERP_DATE_FORMAT).to_string(),
            ),
            None => true,
        }
    }

    fn line_item_selected(
        query: &RemoteQuerySpec,
        excluded: &HashSet<&str>,
        row: &RawRow,
    ) -> bool {
        let document = row.get(line_item_fields::DOC_NO).unwrap_or_default().trim();
        let cost_center = row.get(line_item_fields::COSTCENTER).unwrap_or_default();
        !excluded.contains(document) && query.accepts(COST_CENTER_FIELD, cost_center)
    }
}

impl RemoteQueryExecutor for StaticExecutor {
    fn known_cost_centers(&self, _controlling_area: &str) -> Result<BTreeSet<String>, RemoteError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match &self.lookup_failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.known_cost_centers.clone()),
        }
    }

    fn execute(&self, query: &RemoteQuerySpec) -> Result<RemoteTables, RemoteError> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        if let Some(err) = &self.execute_failure {
            return Err(err.clone());
        }

        let (doc_headers, dropped): (Vec<&RawRow>, Vec<&RawRow>) = self
            .tables
            .doc_headers
            .iter()
            .partition(|row| Self::header_selected(query, row));

        let mut excluded: HashSet<&str> = dropped
            .iter()
            .filter_map(|row| row.get(header_fields::DOC_NO))
            .map(str::trim)
            .collect();
        // A document with a header in range keeps its line items.
        for row in &doc_headers {
            if let Some(document) = row.get(header_fields::DOC_NO) {
                excluded.remove(document.trim());
            }
        }

        Ok(RemoteTables {
            doc_headers: doc_headers.into_iter().cloned().collect(),
            line_items: self
                .tables
                .line_items
                .iter()
                .filter(|row| Self::line_item_selected(query, &excluded, row))
                .cloned()
                .collect(),
        })
    }
}
