//! Structured extraction events.
//!
//! The pipeline never logs directly. It reports [`ExtractionEvent`]s to an
//! injected [`EventSink`]; [`TracingSink`] forwards them to `tracing` and
//! [`MemorySink`] keeps them for inspection.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Something noteworthy that happened during an extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    /// At least one requested cost center exists in the ERP.
    ScopeResolved {
        /// Requested cost centers found in the ERP.
        present: Vec<String>,
        /// Requested cost centers unknown to the ERP.
        absent: Vec<String>,
    },
    /// None of the requested cost centers exist in the ERP.
    ScopeNotFound {
        /// The requested cost centers.
        requested: Vec<String>,
    },
    /// The document query is about to be sent.
    QueryIssued {
        /// Controlling area of the query.
        controlling_area: String,
        /// Number of selection criteria.
        criteria: usize,
    },
    /// A remote call failed.
    RemoteFailure {
        /// The remote operation that failed.
        operation: String,
        /// The backend's failure description.
        message: String,
    },
    /// The ERP returned no document headers.
    NoDocumentHeaders,
    /// The ERP returned no line items.
    NoLineItems,
    /// The ERP returned line items.
    LineItemsReceived {
        /// Number of line items.
        count: usize,
    },
    /// A later header replaced an earlier one with the same number.
    HeaderOverwritten {
        /// The duplicated document number.
        document_number: String,
    },
    /// A line item referenced a document without a header.
    OrphanLineItem {
        /// The unmatched document number.
        document_number: String,
    },
    /// One expense was produced.
    ExpenseProduced {
        /// Document number of the expense.
        document_number: String,
        /// Cost center of the expense.
        cost_center: String,
    },
    /// The run finished successfully.
    ExtractionCompleted {
        /// Number of expenses produced.
        expenses: usize,
        /// Number of skipped orphan line items.
        orphaned_line_items: usize,
    },
}

/// Receives extraction events.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: ExtractionEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn record(&self, event: ExtractionEvent) {
        (**self).record(event)
    }
}

/// Forwards events to `tracing`, optionally tagged with a correlation ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    correlation_id: Option<Uuid>,
}

impl TracingSink {
    /// Creates a sink without correlation ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that tags every event with `correlation_id`.
    pub fn with_correlation_id(correlation_id: Uuid) -> Self {
        Self {
            correlation_id: Some(correlation_id),
        }
    }

    fn correlation(&self) -> String {
        self.correlation_id
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

impl EventSink for TracingSink {
    fn record(&self, event: ExtractionEvent) {
        let correlation_id = self.correlation();
        match event {
            ExtractionEvent::ScopeResolved { present, absent } => {
                info!(
                    correlation_id = %correlation_id,
                    present = ?present,
                    "Will read data from ERP for cost centers"
                );
                if !absent.is_empty() {
                    warn!(
                        correlation_id = %correlation_id,
                        absent = ?absent,
                        "Some requested cost centers do not exist in the ERP"
                    );
                }
            }
            ExtractionEvent::ScopeNotFound { requested } => {
                error!(
                    correlation_id = %correlation_id,
                    requested = ?requested,
                    "None of these cost centers exist in the ERP"
                );
            }
            ExtractionEvent::QueryIssued {
                controlling_area,
                criteria,
            } => {
                info!(
                    correlation_id = %correlation_id,
                    controlling_area = %controlling_area,
                    criteria,
                    "Querying controlling documents"
                );
            }
            ExtractionEvent::RemoteFailure { operation, message } => {
                error!(
                    correlation_id = %correlation_id,
                    operation = %operation,
                    error = %message,
                    "There was a problem downloading data from the ERP"
                );
            }
            ExtractionEvent::NoDocumentHeaders => {
                warn!(correlation_id = %correlation_id, "No doc headers");
            }
            ExtractionEvent::NoLineItems => {
                warn!(correlation_id = %correlation_id, "No line items");
            }
            ExtractionEvent::LineItemsReceived { count } => {
                info!(
                    correlation_id = %correlation_id,
                    count,
                    "Found line items in the ERP"
                );
            }
            ExtractionEvent::HeaderOverwritten { document_number } => {
                warn!(
                    correlation_id = %correlation_id,
                    document_number = %document_number,
                    "Duplicate document header, keeping the later one"
                );
            }
            ExtractionEvent::OrphanLineItem { document_number } => {
                warn!(
                    correlation_id = %correlation_id,
                    document_number = %document_number,
                    "Key not found in header documents table, skipping line item"
                );
            }
            ExtractionEvent::ExpenseProduced {
                document_number,
                cost_center,
            } => {
                debug!(
                    correlation_id = %correlation_id,
                    document_number = %document_number,
                    cost_center = %cost_center,
                    "Got expense"
                );
            }
            ExtractionEvent::ExtractionCompleted {
                expenses,
                orphaned_line_items,
            } => {
                info!(
                    correlation_id = %correlation_id,
                    expenses,
                    orphaned_line_items,
                    "Extraction completed"
                );
            }
        }
    }
}

/// Keeps every recorded event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events in order.
    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Counts recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ExtractionEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(e))
            .count()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: ExtractionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
