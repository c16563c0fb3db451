//! Lineage result schema
//!
//! This is the payload handed to whatever renders lineage. The JSON shape
//! (`current`, `upstream`, `downstream`, each entry `{name, path}`) is what
//! hosts consume, so field names must stay stable.

use serde::{Deserialize, Serialize};

/// One side of a lineage edge: a display name and the file that defines it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEntry {
    /// Display name (`source_name.name` for sources)
    pub name: String,

    /// Path of the defining file, relative to the project root
    pub path: String,
}

impl LineageEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One-hop lineage of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageResult {
    /// The resolved model
    pub current: LineageEntry,

    /// Direct parents, in declaration order
    pub upstream: Vec<LineageEntry>,

    /// Direct model consumers, in manifest order
    pub downstream: Vec<LineageEntry>,
}

impl LineageResult {
    /// Create a result with no neighbors
    pub fn new(current: LineageEntry) -> Self {
        Self {
            current,
            upstream: Vec::new(),
            downstream: Vec::new(),
        }
    }

    /// View title shown by hosts
    pub fn title(&self) -> String {
        format!("Lineage: {}", self.current.name)
    }

    /// True when the model has neither parents nor children
    pub fn is_isolated(&self) -> bool {
        self.upstream.is_empty() && self.downstream.is_empty()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_host_payload_shape() {
        let mut result = LineageResult::new(LineageEntry::new("orders", "models/orders.sql"));
        result
            .upstream
            .push(LineageEntry::new("raw.orders_src", "models/sources.yml"));

        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "current": {"name": "orders", "path": "models/orders.sql"},
                "upstream": [{"name": "raw.orders_src", "path": "models/sources.yml"}],
                "downstream": []
            })
        );
    }

    #[test]
    fn title_and_isolation() {
        let result = LineageResult::new(LineageEntry::new("orders", "models/orders.sql"));
        assert_eq!(result.title(), "Lineage: orders");
        assert!(result.is_isolated());
    }
}
