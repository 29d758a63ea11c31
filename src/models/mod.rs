//! Core data models for the ERP expense extractor.
//!
//! This module contains all the domain models used throughout the pipeline.

mod controlling_document;
mod expense;
mod extraction_request;

pub use controlling_document::{HeaderRecord, LineItemRecord};
pub use expense::{ACTUAL_EXPENSE_TYPE, Expense};
pub use extraction_request::ExtractionRequest;
