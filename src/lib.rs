//! ERP controlling document extraction.
//!
//! This crate reads controlling documents from an ERP backend for a set of
//! cost centers and a posting date range, joins document headers with their
//! line items and turns every line item into a canonical [`models::Expense`].

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod extraction;
pub mod models;
pub mod remote;
