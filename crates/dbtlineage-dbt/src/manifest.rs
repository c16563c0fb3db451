//! dbt manifest.json parsing
//!
//! Parses dbt-generated manifest.json to extract models, seeds, sources and
//! their declared dependencies. Only the fields lineage needs are read; entries
//! missing one of them are skipped rather than failing the whole load.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::ordered::OrderedMap;

/// dbt manifest.json structure (subset of fields we care about)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Manifest {
    /// Metadata about the manifest (informational only)
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<ManifestMetadata>,

    /// Model, seed and test nodes, in file order
    #[serde(default)]
    pub nodes: OrderedMap<ManifestNode>,

    /// Source definitions, in file order
    #[serde(default)]
    pub sources: OrderedMap<ManifestSource>,
}

impl Manifest {
    /// Load the manifest at `manifest_path`, taken relative to `project_root`
    /// unless absolute (dbt writes it to `target/manifest.json`)
    pub fn load(project_root: &Path, manifest_path: &Path) -> Result<Self, ManifestError> {
        if manifest_path.is_absolute() {
            Self::from_file(manifest_path)
        } else {
            Self::from_file(&project_root.join(manifest_path))
        }
    }

    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::ArtifactMissing(path.to_path_buf())
            } else {
                ManifestError::Io(path.display().to_string(), e.to_string())
            }
        })?;

        let manifest = Self::from_str(&contents)?;

        tracing::debug!(
            path = %path.display(),
            nodes = manifest.nodes.len(),
            sources = manifest.sources.len(),
            dbt_version = manifest.dbt_version().unwrap_or("unknown"),
            "loaded manifest"
        );

        Ok(manifest)
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        // Derived struct impls also accept a JSON array; a manifest never is one.
        // Checked up front so entries still stream straight into `OrderedMap`
        // in file order instead of going through a sorted `Value` map.
        if !json.trim_start().starts_with('{') {
            return Err(ManifestError::ArtifactCorrupt(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        serde_json::from_str(json).map_err(|e| ManifestError::ArtifactCorrupt(e.to_string()))
    }

    /// Get all model nodes (filters out tests, seeds, etc.), in file order
    pub fn models(&self) -> impl Iterator<Item = (&str, &ManifestNode)> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.resource_type == ResourceType::Model)
    }

    /// Get a specific node by unique_id
    pub fn get_node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes.get(unique_id)
    }

    /// Get a specific source by unique_id
    pub fn get_source(&self, unique_id: &str) -> Option<&ManifestSource> {
        self.sources.get(unique_id)
    }

    /// dbt version that produced the artifact, when recorded
    pub fn dbt_version(&self) -> Option<&str> {
        self.metadata.as_ref()?.dbt_version.as_deref()
    }
}

/// Manifest metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    #[serde(default)]
    pub dbt_schema_version: Option<String>,
    #[serde(default)]
    pub dbt_version: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ManifestMetadata>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

/// Kind of a manifest node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Model,
    Seed,
    Test,
    /// Snapshots, analyses, operations, ...
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Seed => "seed",
            Self::Test => "test",
            Self::Other(kind) => kind,
        }
    }
}

impl Default for ResourceType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ResourceType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "model" => Self::Model,
            "seed" => Self::Seed,
            "test" => Self::Test,
            _ => Self::Other(kind),
        }
    }
}

impl From<ResourceType> for String {
    fn from(kind: ResourceType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the manifest (model, seed, test, snapshot, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., "users")
    pub name: String,

    /// Resource type (model, test, seed, etc.)
    #[serde(default)]
    pub resource_type: ResourceType,

    /// Original file path
    #[serde(default)]
    pub original_file_path: String,

    /// Dependencies
    #[serde(default, deserialize_with = "lenient_depends_on")]
    pub depends_on: DependsOn,
}

/// Dependencies structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependsOn {
    /// List of node unique_ids this node depends on, in declaration order
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// Read `depends_on.nodes`, dropping anything that is not a string id.
///
/// A node whose dependency block is garbled still gets a lineage entry of its
/// own; it simply declares no parents.
fn lenient_depends_on<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DependsOn, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;

    let nodes = match raw.get("nodes") {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let id = item.as_str();
                if id.is_none() {
                    tracing::debug!(entry = %item, "skipping non-string dependency id");
                }
                id.map(str::to_string)
            })
            .collect(),
        Some(serde_json::Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::debug!(entry = %other, "skipping malformed depends_on.nodes");
            Vec::new()
        }
    };

    Ok(DependsOn { nodes })
}

/// A source in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Source name (e.g., "raw")
    pub source_name: String,

    /// Table name (e.g., "users")
    pub name: String,

    /// YAML file that declares the source
    #[serde(default)]
    pub original_file_path: String,
}

impl ManifestSource {
    /// Display name, `source_name.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.source_name, self.name)
    }
}

/// Manifest loading errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("{} not found. Run 'dbt compile' or 'dbt build' first.", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Failed to parse manifest JSON: {0}")]
    ArtifactCorrupt(String),

    #[error("Failed to read manifest file {0}: {1}")]
    Io(String, String),
}
