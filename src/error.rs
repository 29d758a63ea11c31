//! Error types for the ERP expense extractor.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts an extraction run.

use thiserror::Error;

/// The main error type for the extractor.
///
/// Every failure is reported at the granularity of the whole extraction.
/// Orphaned line items are not errors and never appear here.
///
/// # Example
///
/// ```
/// use erp_expense_extractor::error::ExtractionError;
///
/// let error = ExtractionError::ConfigNotFound {
///     path: "/missing/erp.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/erp.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An extraction request violated one of its invariants.
    #[error("Invalid extraction request field '{field}': {message}")]
    InvalidRequest {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// None of the requested cost centers exist in the ERP.
    #[error("None of these cost centers exist in the ERP: {}", requested.join(", "))]
    ScopeNotFound {
        /// The cost centers that were requested.
        requested: Vec<String>,
    },

    /// The ERP answered the query but returned no line items.
    #[error("No line items returned by the ERP for controlling area '{controlling_area}'")]
    NoLineItems {
        /// The controlling area that was queried.
        controlling_area: String,
    },

    /// A remote call failed. Never retried by the extractor.
    #[error(
        "Remote {operation} failed for controlling area '{controlling_area}' \
         ({criteria} selection criteria): {message}"
    )]
    RemoteExecution {
        /// The remote operation that was attempted.
        operation: String,
        /// The controlling area of the attempted request.
        controlling_area: String,
        /// Number of selection criteria in the attempted request.
        criteria: usize,
        /// The backend's failure description.
        message: String,
    },

    /// A raw result row could not be converted into a typed record.
    #[error("Malformed {table} row {row}, field '{field}': {message}")]
    MalformedRow {
        /// The result table the row came from.
        table: String,
        /// Zero-based row index.
        row: usize,
        /// The field that failed.
        field: String,
        /// A description of the failure.
        message: String,
    },
}

impl ExtractionError {
    /// Returns `true` when the run was aborted before any document query
    /// because the requested scope does not exist remotely.
    pub fn is_scope_not_found(&self) -> bool {
        matches!(self, ExtractionError::ScopeNotFound { .. })
    }

    /// Returns `true` when the ERP answered with an empty line-item table.
    pub fn is_no_data(&self) -> bool {
        matches!(self, ExtractionError::NoLineItems { .. })
    }
}

/// A type alias for Results that return ExtractionError.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = ExtractionError::ConfigNotFound {
            path: "/missing/erp.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/erp.yaml"
        );
    }

    #[test]
    fn test_scope_not_found_lists_requested_cost_centers() {
        let error = ExtractionError::ScopeNotFound {
            requested: vec!["1000".to_string(), "2000".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "None of these cost centers exist in the ERP: 1000, 2000"
        );
        assert!(error.is_scope_not_found());
        assert!(!error.is_no_data());
    }

    #[test]
    fn test_no_line_items_is_distinct_from_scope_not_found() {
        let error = ExtractionError::NoLineItems {
            controlling_area: "1000".to_string(),
        };
        assert!(error.is_no_data());
        assert!(!error.is_scope_not_found());
    }

    #[test]
    fn test_remote_execution_displays_request_context() {
        let error = ExtractionError::RemoteExecution {
            operation: "BAPI_ACC_CO_DOCUMENT_FIND".to_string(),
            controlling_area: "1000".to_string(),
            criteria: 3,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Remote BAPI_ACC_CO_DOCUMENT_FIND failed for controlling area '1000' \
             (3 selection criteria): connection refused"
        );
    }

    #[test]
    fn test_malformed_row_displays_location() {
        let error = ExtractionError::MalformedRow {
            table: "LINE_ITEMS".to_string(),
            row: 4,
            field: "VALUE_COCUR".to_string(),
            message: "invalid decimal".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed LINE_ITEMS row 4, field 'VALUE_COCUR': invalid decimal"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ExtractionError>();
    }
}
