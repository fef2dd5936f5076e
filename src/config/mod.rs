//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load yearly economic constants,
//! tax and subsidy tables, the concept catalog and the vacation policy from
//! YAML files, and to hold them as an immutable snapshot.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::{ConfigLoader, ConfigStore};
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap().into_config();
//! let store = ConfigStore::new(config);
//! let snapshot = store.snapshot();
//! println!("Years configured: {:?}", snapshot.years().collect::<Vec<_>>());
//! ```

mod loader;
mod store;
mod tables;
mod types;

pub use loader::ConfigLoader;
pub use store::ConfigStore;
pub use tables::{Bracket, BracketTable, SubsidyBand, SubsidyTable, YearTables};
pub use types::{
    ConceptDefinition, ConceptsConfig, ContributionRates, EconomicIndexSet,
    EmployeeContributionRates, EmployerContributionRates, PayrollConfig, VacationPolicy,
    VacationStep,
};
