//! Configuration types for ERP extraction.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveDate;
use serde::Deserialize;

/// ERP input settings from `erp.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErpInputConfig {
    /// Name of the ERP destination the session layer connects to.
    pub destination: String,
    /// The controlling area to read documents from.
    pub controlling_area: String,
    /// The accounting period; absent means all periods.
    #[serde(default)]
    pub period: Option<u32>,
    /// First posting date to extract (inclusive).
    pub from_time: NaiveDate,
    /// Last posting date to extract (inclusive).
    pub to_time: NaiveDate,
}

/// Cost center settings from `cost_centers.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CostCenterConfig {
    /// Cost centers to extract expenses for.
    pub cost_centers: Vec<String>,
}
