//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::tables::YearTables;
use super::types::{ConceptsConfig, EconomicIndexSet, PayrollConfig, VacationPolicy};

/// Loads payroll configuration from a directory of YAML files.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── concepts.yaml        # Registered concept catalog
/// ├── vacation.yaml        # Vacation entitlement scale and premium rate
/// ├── indices/
/// │   └── 2025.yaml        # Economic index set for the year
/// └── tables/
///     └── 2025.yaml        # Bracket and subsidy tables for the year
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// let index_set = loader.config().index_set(2025).unwrap();
/// println!("Reference index: {}", index_set.reference_index_value);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file or directory is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or an invalid table (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let concepts = Self::load_yaml::<ConceptsConfig>(&path.join("concepts.yaml"))?;
        let vacation = Self::load_yaml::<VacationPolicy>(&path.join("vacation.yaml"))?;
        let indices = Self::load_dir::<EconomicIndexSet>(&path.join("indices"))?;
        let tables = Self::load_dir::<YearTables>(&path.join("tables"))?;

        debug!(
            path = %path.display(),
            concepts = concepts.concepts.len(),
            index_years = indices.len(),
            table_years = tables.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(indices, tables, concepts.concepts, vacation),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every `.yaml` file of a directory, in file-name order.
    fn load_dir<T: for<'de> Deserialize<'de>>(dir: &Path) -> EngineResult<Vec<T>> {
        let dir_str = dir.display().to_string();

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no yaml files found)", dir_str),
            });
        }

        paths.sort();
        paths.iter().map(|path| Self::load_yaml::<T>(path)).collect()
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}
