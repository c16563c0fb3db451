//! dbt-lineage engine
//!
//! This crate implements the lineage logic:
//! - One-hop upstream/downstream resolution for a model
//! - File-to-model mapping and project checks for hosts
//! - The single-view session hosts drive

pub mod project;
pub mod resolver;
pub mod session;

pub use project::{is_dbt_project, lineage_for_file, model_name_from_path, resolve_open_file};
pub use resolver::{resolve, resolve_lineage, LineageResolver};
pub use session::{LineageSession, OpenOutcome, RequestTicket, UpdateOutcome, ViewState};

use dbtlineage_dbt::ManifestError;

/// Lineage request errors.
///
/// Only artifact problems are errors. A name that matches no model is a
/// normal `None` result.
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl LineageError {
    /// Whether the build artifact has never been produced
    pub fn is_artifact_missing(&self) -> bool {
        matches!(self, Self::Manifest(ManifestError::ArtifactMissing(_)))
    }
}
