//! Application state for the extractor API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::remote::RemoteQueryExecutor;

/// Shared application state.
///
/// Holds the ERP executor. Extraction state itself is never shared between
/// requests.
#[derive(Clone)]
pub struct AppState {
    executor: Arc<dyn RemoteQueryExecutor>,
}

impl AppState {
    /// Creates a new application state around the given executor.
    pub fn new(executor: impl RemoteQueryExecutor + 'static) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Returns a handle to the executor.
    pub fn executor(&self) -> Arc<dyn RemoteQueryExecutor> {
        Arc::clone(&self.executor)
    }
}
