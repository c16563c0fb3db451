//! dbt-lineage Core
//!
//! Shared types: the lineage payload handed to hosts and the project
//! configuration.

pub mod config;
pub mod lineage;

pub use config::{Config, ConfigError, CONFIG_FILE_NAME};
pub use lineage::{LineageEntry, LineageResult};
