//! Project-level helpers used by hosts
//!
//! Mapping an editor file to a model name, checking the project marker, and
//! turning a lineage entry's path back into a file to open.

use dbtlineage_core::{Config, LineageResult};
use std::path::{Path, PathBuf};

use crate::resolver::resolve_lineage;
use crate::LineageError;

/// Model name for a file, when its extension can name a model.
///
/// `models/orders.sql` and `models/orders.yml` both map to `orders`.
pub fn model_name_from_path(path: &Path, config: &Config) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !config.is_model_extension(extension) {
        return None;
    }

    path.file_stem()?.to_str().map(str::to_string)
}

/// Whether `root` holds the project marker file (`dbt_project.yml` by default)
pub fn is_dbt_project(root: &Path, config: &Config) -> bool {
    root.join(&config.project_marker).is_file()
}

/// Absolute path for a lineage entry's project-relative path
pub fn resolve_open_file(root: &Path, relative: &str) -> PathBuf {
    root.join(relative)
}

/// Lineage for the model a file defines.
///
/// Files that cannot name a model, and directories that are not dbt
/// projects, give `Ok(None)` the same way an unknown model does.
pub fn lineage_for_file(
    root: &Path,
    file: &Path,
    config: &Config,
) -> Result<Option<LineageResult>, LineageError> {
    let Some(model_name) = model_name_from_path(file, config) else {
        tracing::debug!(file = %file.display(), "file does not name a model");
        return Ok(None);
    };

    if !is_dbt_project(root, config) {
        tracing::debug!(root = %root.display(), marker = %config.project_marker, "not a dbt project");
        return Ok(None);
    }

    resolve_lineage(root, &model_name, config)
}
