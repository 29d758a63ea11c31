//! Boundary to the ERP backend.
//!
//! The extractor talks to the ERP only through the [`RemoteQueryExecutor`]
//! trait. Establishing the session and marshalling the call belong to the
//! implementor; the pipeline sees raw tables or a [`RemoteError`].

mod rows;
mod static_executor;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::RemoteQuerySpec;

pub use rows::{
    ERP_DATE_FORMAT, RawRow, header_fields, line_item_fields, parse_erp_amount, parse_erp_date,
    parse_headers, parse_line_items,
};
pub use static_executor::StaticExecutor;

/// Result table holding document headers.
pub const DOC_HEADER_TABLE: &str = "DOC_HEADERS";

/// Result table holding line items.
pub const LINE_ITEMS_TABLE: &str = "LINE_ITEMS";

/// Operation name used when the cost center lookup fails.
pub const COST_CENTER_LOOKUP: &str = "cost center lookup";

/// Failure reported by a remote collaborator.
///
/// The extractor does not distinguish transient from permanent failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// What went wrong, as reported by the backend.
    pub message: String,
}

impl RemoteError {
    /// Creates a remote error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The two tables returned by a document search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTables {
    /// Rows of `DOC_HEADERS`.
    #[serde(default)]
    pub doc_headers: Vec<RawRow>,
    /// Rows of `LINE_ITEMS`.
    #[serde(default)]
    pub line_items: Vec<RawRow>,
}

/// Executes remote calls against the ERP.
///
/// Implementations must be safe to share between threads; each call is
/// independent and the extractor never retries.
pub trait RemoteQueryExecutor: Send + Sync {
    /// Returns the cost centers that exist in `controlling_area`.
    fn known_cost_centers(&self, controlling_area: &str) -> Result<BTreeSet<String>, RemoteError>;

    /// Runs a document search and returns its result tables.
    fn execute(&self, query: &RemoteQuerySpec) -> Result<RemoteTables, RemoteError>;
}

impl<T: RemoteQueryExecutor + ?Sized> RemoteQueryExecutor for &T {
    fn known_cost_centers(&self, controlling_area: &str) -> Result<BTreeSet<String>, RemoteError> {
        (**self).known_cost_centers(controlling_area)
    }

    fn execute(&self, query: &RemoteQuerySpec) -> Result<RemoteTables, RemoteError> {
        (**self).execute(query)
    }
}

impl<T: RemoteQueryExecutor + ?Sized> RemoteQueryExecutor for Arc<T> {
    fn known_cost_centers(&self, controlling_area: &str) -> Result<BTreeSet<String>, RemoteError> {
        (**self).known_cost_centers(controlling_area)
    }

    fn execute(&self, query: &RemoteQuerySpec) -> Result<RemoteTables, RemoteError> {
        (**self).execute(query)
    }
}
