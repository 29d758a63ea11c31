//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading extraction
//! settings from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{ExtractionError, ExtractionResult};
use crate::models::ExtractionRequest;

use super::types::{CostCenterConfig, ErpInputConfig};

/// Loads and provides access to extraction configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sample/
/// ├── erp.yaml           # Destination, controlling area, period, date range
/// └── cost_centers.yaml  # Cost centers to extract
/// ```
///
/// # Example
///
/// ```no_run
/// use erp_expense_extractor::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sample")?;
/// let request = loader.extraction_request()?;
/// println!("Controlling area: {}", request.controlling_area());
/// # Ok::<(), erp_expense_extractor::error::ExtractionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    erp: ErpInputConfig,
    cost_centers: CostCenterConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if a file is missing and `ConfigParseError`
    /// if a file contains invalid YAML or lacks a required field.
    pub fn load<P: AsRef<Path>>(path: P) -> ExtractionResult<Self> {
        let path = path.as_ref();

        let erp = Self::load_yaml::<ErpInputConfig>(&path.join("erp.yaml"))?;
        let cost_centers = Self::load_yaml::<CostCenterConfig>(&path.join("cost_centers.yaml"))?;

        Ok(Self { erp, cost_centers })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ExtractionResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ExtractionError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ExtractionError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the configured cost centers.
    pub fn cost_centers(&self) -> &[String] {
        &self.cost_centers.cost_centers
    }

    /// Returns the ERP destination name.
    pub fn destination(&self) -> &str {
        &self.erp.destination
    }

    /// Builds the validated extraction request described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the date range is inverted, the
    /// controlling area is blank or no cost center is configured.
    pub fn extraction_request(&self) -> ExtractionResult<ExtractionRequest> {
        ExtractionRequest::new(
            self.erp.controlling_area.clone(),
            self.erp.from_time,
            self.erp.to_time,
            self.erp.period,
            self.cost_centers.cost_centers.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config_path() -> &'static str {
        "./config/sample"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.destination(), "system");
        let request = loader.extraction_request().unwrap();
        assert_eq!(request.controlling_area(), "1000");
        assert_eq!(request.period(), None);
    }

    #[test]
    fn test_cost_centers_loaded_in_order() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(
            loader.cost_centers(),
            ["0000001000", "0000002000", "0000009999"]
        );
    }

    #[test]
    fn test_extraction_request_from_configuration() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let request = loader.extraction_request().unwrap();

        assert_eq!(request.controlling_area(), "1000");
        assert_eq!(
            request.from_time(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            request.to_time(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(request.cost_centers().len(), 3);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(ExtractionError::ConfigNotFound { path }) => {
                assert!(path.contains("erp.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_parse_error_names_file() {
        let result = ConfigLoader::load_yaml::<ErpInputConfig>(Path::new(
            "./config/sample/cost_centers.yaml",
        ));

        match result {
            Err(ExtractionError::ConfigParseError { path, .. }) => {
                assert!(path.ends_with("cost_centers.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
