//! # Manifest and Catalog
//!
//! Two views of the registered calculations:
//!
//! - [`Manifest`] - ordered list of ids grouped by node, consumed by the test harness
//! - [`Catalog`] - category tree with titles and descriptions, for navigation
//!
//! ## JSON Example (manifest)
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "name": "hydraulic_calculations",
//!       "calculations": [
//!         { "id": "pipe_flow_resistance", "path": "hydraulic_calculations/pipe_flow_resistance" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// One calculation reference inside a manifest node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    pub name: String,
    #[serde(default)]
    pub calculations: Vec<ManifestEntry>,
}

/// Ordered set of calculations to exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub nodes: Vec<ManifestNode>,
}

impl Manifest {
    /// Single-node manifest over `ids`, in order
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let calculations = ids
            .into_iter()
            .map(|id| ManifestEntry {
                id: id.into(),
                path: None,
            })
            .collect();
        Self {
            nodes: vec![ManifestNode {
                name: "calculations".to_string(),
                calculations,
            }],
        }
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Flatten to ids in node order, then entry order. Duplicates are kept.
    pub fn calculation_ids(&self) -> Vec<String> {
        self.nodes
            .iter()
            .flat_map(|node| node.calculations.iter().map(|entry| entry.id.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().map(|node| node.calculations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Navigation entry for one calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Category with its calculations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub id: String,
    pub title: String,
    pub calculations: Vec<CatalogEntry>,
}

pub type Catalog = Vec<CatalogCategory>;

/// Human title for a snake_case category id: `"hydraulic_calculations"` → `"Hydraulic Calculations"`
pub fn category_title(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
