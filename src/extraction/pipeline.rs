//! The extraction pipeline.
//!
//! [`Extractor`] runs scope validation, query building, the remote search,
//! reconciliation and normalization for one [`ExtractionRequest`] at a time.

use serde::Serialize;

use crate::error::{ExtractionError, ExtractionResult};
use crate::events::{EventSink, ExtractionEvent, TracingSink};
use crate::models::{Expense, ExtractionRequest};
use crate::remote::{COST_CENTER_LOOKUP, RemoteQueryExecutor, parse_headers, parse_line_items};

use super::normalize::normalize;
use super::query::build_request;
use super::reconcile::{HeaderLookup, reconcile};
use super::scope::validate_scope;

/// Expenses of a successful run plus what was set aside on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionOutcome {
    /// Expenses in line-item order.
    pub expenses: Vec<Expense>,
    /// Line items skipped for lack of a header.
    pub orphaned_line_items: usize,
    /// Headers replaced by a later header with the same document number.
    pub overwritten_headers: usize,
}

/// Runs extractions against one ERP.
///
/// Every call to [`Extractor::extract`] fetches its own set of known cost
/// centers and builds its own header lookup, so an extractor can be shared
/// between threads.
pub struct Extractor<E, S = TracingSink> {
    executor: E,
    events: S,
}

impl<E: RemoteQueryExecutor> Extractor<E> {
    /// Creates an extractor that logs through `tracing`.
    pub fn new(executor: E) -> Self {
        Self::with_events(executor, TracingSink::new())
    }
}

impl<E: RemoteQueryExecutor, S: EventSink> Extractor<E, S> {
    /// Creates an extractor reporting to the given event sink.
    pub fn with_events(executor: E, events: S) -> Self {
        Self { executor, events }
    }

    /// Extracts the expenses described by `request`.
    ///
    /// # Errors
    ///
    /// - `ScopeNotFound` if none of the requested cost centers exist in the
    ///   ERP; no document search is sent.
    /// - `RemoteExecution` if the cost center lookup or the search fails.
    /// - `NoLineItems` if the search returned no line items.
    /// - `MalformedRow` if a returned row cannot be read.
    pub fn extract(&self, request: &ExtractionRequest) -> ExtractionResult<ExtractionOutcome> {
        let controlling_area = request.controlling_area();

        let known = self
            .executor
            .known_cost_centers(controlling_area)
            .map_err(|e| self.remote_failure(COST_CENTER_LOOKUP, controlling_area, 0, e.message))?;

        let scope = validate_scope(request.cost_centers(), &known);
        if !scope.proceed {
            let requested = request.cost_centers().to_vec();
            self.events.record(ExtractionEvent::ScopeNotFound {
                requested: requested.clone(),
            });
            return Err(ExtractionError::ScopeNotFound { requested });
        }
        self.events.record(ExtractionEvent::ScopeResolved {
            present: scope.present.clone(),
            absent: scope.absent.clone(),
        });

        let query = build_request(request, &scope.present);
        let criteria = query.selection_criteria.len();
        self.events.record(ExtractionEvent::QueryIssued {
            controlling_area: controlling_area.to_string(),
            criteria,
        });

        let tables = self
            .executor
            .execute(&query)
            .map_err(|e| self.remote_failure(&query.function, controlling_area, criteria, e.message))?;

        if tables.doc_headers.is_empty() {
            self.events.record(ExtractionEvent::NoDocumentHeaders);
        }
        if tables.line_items.is_empty() {
            self.events.record(ExtractionEvent::NoLineItems);
            return Err(ExtractionError::NoLineItems {
                controlling_area: controlling_area.to_string(),
            });
        }
        self.events.record(ExtractionEvent::LineItemsReceived {
            count: tables.line_items.len(),
        });

        let lookup = HeaderLookup::build(parse_headers(&tables.doc_headers)?);
        for document_number in lookup.overwritten() {
            self.events.record(ExtractionEvent::HeaderOverwritten {
                document_number: document_number.clone(),
            });
        }

        let reconciliation = reconcile(&lookup, parse_line_items(&tables.line_items)?);
        for document_number in &reconciliation.orphans {
            self.events.record(ExtractionEvent::OrphanLineItem {
                document_number: document_number.clone(),
            });
        }
        let orphaned_line_items = reconciliation.orphan_count();

        let expenses: Vec<Expense> = reconciliation
            .pairs
            .into_iter()
            .map(|pair| {
                let expense = normalize(pair);
                self.events.record(ExtractionEvent::ExpenseProduced {
                    document_number: expense.document_number.clone(),
                    cost_center: expense.cost_center.clone(),
                });
                expense
            })
            .collect();

        self.events.record(ExtractionEvent::ExtractionCompleted {
            expenses: expenses.len(),
            orphaned_line_items,
        });

        Ok(ExtractionOutcome {
            expenses,
            orphaned_line_items,
            overwritten_headers: lookup.overwritten().len(),
        })
    }

    fn remote_failure(
        &self,
        operation: &str,
        controlling_area: &str,
        criteria: usize,
        message: String,
    ) -> ExtractionError {
        self.events.record(ExtractionEvent::RemoteFailure {
            operation: operation.to_string(),
            message: message.clone(),
        });
        ExtractionError::RemoteExecution {
            operation: operation.to_string(),
            controlling_area: controlling_area.to_string(),
            criteria,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::models::{HeaderRecord, LineItemRecord};
    use crate::remote::StaticExecutor;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn request(cost_centers: &[&str]) -> ExtractionRequest {
        ExtractionRequest::new(
            "1000",
            make_date("2024-01-01"),
            make_date("2024-01-31"),
            None,
            cost_centers.iter().copied(),
        )
        .unwrap()
    }

    fn header(doc: &str, date: &str, currency: &str) -> HeaderRecord {
        HeaderRecord {
            document_number: doc.to_string(),
            posting_date: make_date(date),
            document_currency: currency.to_string(),
        }
    }

    fn line(doc: &str, cost_center: &str, amount: &str) -> LineItemRecord {
        LineItemRecord {
            document_number: doc.to_string(),
            cost_center: cost_center.to_string(),
            cost_element: "0000400000".to_string(),
            person_number: String::new(),
            order_id: String::new(),
            segment_text: String::new(),
            value_in_company_currency: Decimal::from_str(amount).unwrap(),
        }
    }

    #[test]
    fn test_unknown_scope_sends_no_query() {
        let executor = StaticExecutor::with_documents(
            ["0010"],
            &[header("1", "2024-01-05", "EUR")],
            &[line("1", "0010", "1.00")],
        );
        let sink = MemorySink::new();
        let extractor = Extractor::with_events(&executor, &sink);

        let result = extractor.extract(&request(&["0099", "0098"]));

        match result {
            Err(ExtractionError::ScopeNotFound { requested }) => {
                assert_eq!(requested, ["0099", "0098"]);
            }
            other => panic!("Expected ScopeNotFound, got {:?}", other),
        }
        assert!(executor.issued_queries().is_empty());
        assert_eq!(
            sink.count(|e| matches!(e, ExtractionEvent::ScopeNotFound { .. })),
            1
        );
    }

    #[test]
    fn test_partial_scope_queries_present_cost_centers_only() {
        let executor = StaticExecutor::with_documents(
            ["0010", "0020"],
            &[header("1", "2024-01-05", "EUR")],
            &[line("1", "0010", "1.00")],
        );
        let sink = MemorySink::new();
        let extractor = Extractor::with_events(&executor, &sink);

        let outcome = extractor.extract(&request(&["0020", "0077", "0010"])).unwrap();
        assert_eq!(outcome.expenses.len(), 1);

        let queries = executor.issued_queries();
        assert_eq!(queries.len(), 1);
        let cost_centers: Vec<&str> = queries[0]
            .criteria_for("KOSTL")
            .map(|c| c.low.as_str())
            .collect();
        assert_eq!(cost_centers, ["0020", "0010"]);

        assert!(sink.events().contains(&ExtractionEvent::ScopeResolved {
            present: vec!["0020".to_string(), "0010".to_string()],
            absent: vec!["0077".to_string()],
        }));
    }

    #[test]
    fn test_orphans_are_reported_not_fatal() {
        let executor = StaticExecutor::with_documents(
            ["0010"],
            &[header("1", "2024-01-05", "USD")],
            &[line("1", "0010", "1.00"), line("2", "0010", "2.00")],
        );
        let sink = MemorySink::new();

        let outcome = Extractor::with_events(&executor, &sink)
            .extract(&request(&["0010"]))
            .unwrap();

        assert_eq!(outcome.expenses.len(), 1);
        assert_eq!(outcome.orphaned_line_items, 1);
        assert!(sink.events().contains(&ExtractionEvent::OrphanLineItem {
            document_number: "2".to_string()
        }));
    }

    #[test]
    fn test_empty_line_items_is_no_data() {
        let executor = StaticExecutor::with_documents(
            ["0010"],
            &[header("1", "2024-01-05", "USD")],
            &[],
        );
        let sink = MemorySink::new();

        let result = Extractor::with_events(&executor, &sink).extract(&request(&["0010"]));

        assert!(matches!(result, Err(ExtractionError::NoLineItems { .. })));
        assert_eq!(sink.count(|e| *e == ExtractionEvent::NoLineItems), 1);
    }

    #[test]
    fn test_empty_headers_warn_and_orphan_everything() {
        let executor = StaticExecutor::with_documents(["0010"], &[], &[line("1", "0010", "1.00")]);
        let sink = MemorySink::new();

        let outcome = Extractor::with_events(&executor, &sink)
            .extract(&request(&["0010"]))
            .unwrap();

        assert!(outcome.expenses.is_empty());
        assert_eq!(outcome.orphaned_line_items, 1);
        assert_eq!(sink.count(|e| *e == ExtractionEvent::NoDocumentHeaders), 1);
    }

    #[test]
    fn test_lookup_failure_is_remote_execution() {
        let executor = StaticExecutor::default().fail_lookup("RFC_COMMUNICATION_FAILURE");
        let sink = MemorySink::new();

        let result = Extractor::with_events(&executor, &sink).extract(&request(&["0010"]));

        match result {
            Err(ExtractionError::RemoteExecution {
                operation,
                controlling_area,
                criteria,
                message,
            }) => {
                assert_eq!(operation, "cost center lookup");
                assert_eq!(controlling_area, "1000");
                assert_eq!(criteria, 0);
                assert_eq!(message, "RFC_COMMUNICATION_FAILURE");
            }
            other => panic!("Expected RemoteExecution, got {:?}", other),
        }
        assert!(executor.issued_queries().is_empty());
    }

    #[test]
    fn test_execute_failure_carries_request_context() {
        let executor = StaticExecutor::with_documents(["0010", "0020"], &[], &[])
            .fail_execute("backend dump");

        let result = Extractor::new(&executor).extract(&request(&["0010", "0020"]));

        match result {
            Err(ExtractionError::RemoteExecution {
                operation, criteria, ..
            }) => {
                assert_eq!(operation, "BAPI_ACC_CO_DOCUMENT_FIND");
                assert_eq!(criteria, 3);
            }
            other => panic!("Expected RemoteExecution, got {:?}", other),
        }
        assert_eq!(executor.issued_queries().len(), 1);
    }

    #[test]
    fn test_duplicate_headers_are_counted() {
        let executor = StaticExecutor::with_documents(
            ["0010"],
            &[
                header("1", "2024-01-05", "USD"),
                header("1", "2024-01-06", "EUR"),
            ],
            &[line("1", "0010", "1.00")],
        );

        let outcome = Extractor::new(&executor).extract(&request(&["0010"])).unwrap();

        assert_eq!(outcome.overwritten_headers, 1);
        assert_eq!(outcome.expenses[0].currency, "EUR");
        assert_eq!(outcome.expenses[0].date, make_date("2024-01-06"));
    }

    #[test]
    fn test_malformed_row_fails_extraction() {
        use crate::remote::{RawRow, RemoteTables};

        let executor = StaticExecutor::new(
            ["0010"],
            RemoteTables {
                doc_headers: vec![
                    RawRow::new()
                        .with("DOC_NO", "1")
                        .with("POSTGDATE", "20240105")
                        .with("CO_AREA_CURR", "EUR"),
                ],
                line_items: vec![
                    RawRow::new()
                        .with("DOC_NO", "1")
                        .with("COSTCENTER", "0010")
                        .with("COST_ELEM", "0000400000")
                        .with("VALUE_COCUR", "n/a"),
                ],
            },
        );

        let result = Extractor::new(&executor).extract(&request(&["0010"]));
        assert!(matches!(
            result,
            Err(ExtractionError::MalformedRow { ref field, .. }) if field == "VALUE_COCUR"
        ));
    }

    #[test]
    fn test_header_without_currency_fails_extraction() {
        use crate::remote::{RawRow, RemoteTables};

        let executor = StaticExecutor::new(
            ["0010"],
            RemoteTables {
                doc_headers: vec![RawRow::new().with("DOC_NO", "D1 ").with("POSTGDATE", "20240105")],
                line_items: vec![
                    RawRow::new()
                        .with("DOC_NO", "D1")
                        .with("COSTCENTER", "0010")
                        .with("COST_ELEM", "0000400000")
                        .with("VALUE_COCUR", "10.00"),
                ],
            },
        );
        let sink = MemorySink::new();

        let result = Extractor::with_events(&executor, &sink).extract(&request(&["0010"]));

        match result {
            Err(ExtractionError::MalformedRow { table, row, field, .. }) => {
                assert_eq!(table, "DOC_HEADERS");
                assert_eq!(row, 0);
                assert_eq!(field, "CO_AREA_CURR");
            }
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
        assert_eq!(
            sink.count(|e| matches!(e, ExtractionEvent::ExpenseProduced { .. })),
            0
        );
    }
}
