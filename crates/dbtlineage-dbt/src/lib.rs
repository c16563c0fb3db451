//! dbt artifact parsing and lookup
//!
//! This crate handles:
//! - Parsing manifest.json (dbt-generated artifacts), keeping file order
//! - Indexing models, seeds and sources for name and id lookup

pub mod index;
pub mod manifest;
pub mod ordered;

pub use index::{NodeIndex, Resolved};
pub use manifest::{
    DependsOn, Manifest, ManifestError, ManifestMetadata, ManifestNode, ManifestSource,
    ResourceType,
};
pub use ordered::OrderedMap;
