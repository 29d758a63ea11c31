//! Configuration loading for the ERP expense extractor.
//!
//! This module loads extraction settings from YAML files: the ERP
//! destination, controlling area, optional period, date range and the cost
//! centers to extract.
//!
//! # Example
//!
//! ```no_run
//! use erp_expense_extractor::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sample").unwrap();
//! println!("Destination: {}", config.destination());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CostCenterConfig, ErpInputConfig};
