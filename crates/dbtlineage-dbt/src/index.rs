//! Read-only lookup view over a loaded manifest
//!
//! Separates the three node classes lineage cares about: models, seeds and
//! sources. Nothing here is cached across manifests; an index borrows the
//! manifest it was built from.

use crate::manifest::{Manifest, ManifestNode, ManifestSource};

/// What a dependency id points at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// An entry of `nodes` (model, seed, test, ...)
    Node(&'a ManifestNode),

    /// An entry of `sources`
    Source(&'a ManifestSource),
}

/// Name- and id-based lookups over one manifest
#[derive(Debug, Clone, Copy)]
pub struct NodeIndex<'a> {
    manifest: &'a Manifest,
}

impl<'a> NodeIndex<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self { manifest }
    }

    /// First model, in manifest order, whose name matches.
    ///
    /// Seeds and sources with the same name are never returned.
    pub fn find_model_by_name(&self, name: &str) -> Option<(&'a str, &'a ManifestNode)> {
        self.all_model_nodes().find(|(_, node)| node.name == name)
    }

    /// Look an id up in `nodes`, then in `sources`. Unknown ids yield `None`.
    pub fn resolve_dependency_id(&self, id: &str) -> Option<Resolved<'a>> {
        if let Some(node) = self.manifest.get_node(id) {
            return Some(Resolved::Node(node));
        }

        self.manifest.get_source(id).map(Resolved::Source)
    }

    /// All model nodes in manifest order
    pub fn all_model_nodes(&self) -> impl Iterator<Item = (&'a str, &'a ManifestNode)> + 'a {
        self.manifest.models()
    }
}
