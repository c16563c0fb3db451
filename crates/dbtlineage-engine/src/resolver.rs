//! One-hop lineage resolution
//!
//! Upstream comes from the target's declared `depends_on.nodes`, resolved
//! through the [`NodeIndex`]. Downstream is a full scan of every model for
//! those that list the target among their dependencies; no reverse adjacency
//! is kept because each request loads a fresh manifest anyway.

use dbtlineage_core::{Config, LineageEntry, LineageResult};
use dbtlineage_dbt::{Manifest, ManifestNode, NodeIndex, Resolved, ResourceType};
use std::collections::HashSet;
use std::path::Path;

use crate::LineageError;

/// Computes lineage for models of a single manifest
pub struct LineageResolver<'a> {
    index: NodeIndex<'a>,
}

impl<'a> LineageResolver<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self {
            index: NodeIndex::new(manifest),
        }
    }

    /// Resolve the lineage of the model named `model_name`.
    ///
    /// Returns `None` when no model has that name, including when the name
    /// belongs to a seed or a source.
    pub fn resolve(&self, model_name: &str) -> Option<LineageResult> {
        let Some((target_id, target)) = self.index.find_model_by_name(model_name) else {
            tracing::debug!(model = model_name, "no model with this name");
            return None;
        };

        let result = LineageResult {
            current: LineageEntry::new(&target.name, &target.original_file_path),
            upstream: self.upstream(target_id, target),
            downstream: self.downstream(target_id),
        };

        tracing::debug!(
            model = model_name,
            id = target_id,
            upstream = result.upstream.len(),
            downstream = result.downstream.len(),
            "resolved lineage"
        );

        Some(result)
    }

    /// Direct parents in declaration order, first occurrence of each id kept
    fn upstream(&self, target_id: &str, target: &ManifestNode) -> Vec<LineageEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for parent_id in &target.depends_on.nodes {
            if parent_id == target_id || !seen.insert(parent_id.as_str()) {
                continue;
            }

            let entry = match self.index.resolve_dependency_id(parent_id) {
                Some(Resolved::Node(node)) => match node.resource_type {
                    ResourceType::Model | ResourceType::Seed => {
                        LineageEntry::new(&node.name, &node.original_file_path)
                    }
                    _ => {
                        tracing::trace!(parent = %parent_id, kind = %node.resource_type, "skipping parent");
                        continue;
                    }
                },
                Some(Resolved::Source(source)) => {
                    LineageEntry::new(source.qualified_name(), &source.original_file_path)
                }
                None => {
                    tracing::trace!(parent = %parent_id, "dangling dependency id");
                    continue;
                }
            };

            entries.push(entry);
        }

        entries
    }

    /// Models that list `target_id` as a dependency, in manifest order
    fn downstream(&self, target_id: &str) -> Vec<LineageEntry> {
        self.index
            .all_model_nodes()
            .filter(|(id, _)| *id != target_id)
            .filter(|(_, node)| node.depends_on.nodes.iter().any(|dep| dep == target_id))
            .map(|(_, node)| LineageEntry::new(&node.name, &node.original_file_path))
            .collect()
    }
}

/// Resolve lineage for `model_name` against an already loaded manifest
pub fn resolve(manifest: &Manifest, model_name: &str) -> Option<LineageResult> {
    LineageResolver::new(manifest).resolve(model_name)
}

/// Load the project's manifest and resolve lineage for `model_name`.
///
/// The manifest is read on every call so the result reflects the latest
/// build. Only a missing or unreadable manifest is an error; an unknown model
/// is `Ok(None)`.
pub fn resolve_lineage(
    project_root: &Path,
    model_name: &str,
    config: &Config,
) -> Result<Option<LineageResult>, LineageError> {
    let manifest = Manifest::load(project_root, &config.manifest_path)?;
    Ok(resolve(&manifest, model_name))
}
