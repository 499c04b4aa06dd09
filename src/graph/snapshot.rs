//! JSON snapshot loading
//!
//! A snapshot lists categories and `[parent_key, child_key]` subcategory
//! pairs:
//!
//! ```json
//! { "categories": [{"title": "Animals", "f_title": "animals"},
//!                  {"title": "Extinct animals"}],
//!   "subcat": [["animals", "extinct_animals"]] }
//! ```
//!
//! A category without `f_title` is keyed by [`fold_title`] of its title.

use super::store::{CategoryGraph, GraphError, GraphResult};
use super::types::fold_title;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotCategory {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<SnapshotCategory>,
    #[serde(default)]
    pub subcat: Vec<(String, String)>,
}

impl Snapshot {
    pub fn from_reader(reader: impl Read) -> GraphResult<Self> {
        serde_json::from_reader(reader).map_err(|e| GraphError::Snapshot(e.to_string()))
    }

    /// Build the graph. Edges naming an unknown category are skipped.
    pub fn into_graph(self) -> CategoryGraph {
        let mut graph = CategoryGraph::new();
        for category in self.categories {
            let key = category
                .f_title
                .unwrap_or_else(|| fold_title(&category.title));
            graph.add_category(category.title, key);
        }

        let mut skipped = 0usize;
        for (parent, child) in &self.subcat {
            if let Err(e) = graph.add_subcat(parent, child) {
                debug!("Skipping subcat edge {} -> {}: {}", parent, child, e);
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!("Skipped {} subcat edges with unknown endpoints", skipped);
        }
        graph
    }
}

/// Read a snapshot file into a new graph
pub fn load_snapshot(path: impl AsRef<Path>) -> GraphResult<CategoryGraph> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| GraphError::Snapshot(format!("{}: {}", path.display(), e)))?;
    let graph = Snapshot::from_reader(BufReader::new(file))?.into_graph();
    info!(
        "Loaded snapshot {} ({} categories, {} edges)",
        path.display(),
        graph.category_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_graph_folds_missing_keys() {
        let json = r#"{
            "categories": [{"title": "Animals", "f_title": "animals"}, {"title": "Extinct animals"}],
            "subcat": [["animals", "extinct_animals"], ["animals", "plants"]]
        }"#;
        let graph = Snapshot::from_reader(json.as_bytes()).unwrap().into_graph();

        assert_eq!(graph.category_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.get_by_key("extinct_animals").unwrap().title, "Extinct animals");
    }

    #[test]
    fn test_bad_json_is_snapshot_error() {
        let err = Snapshot::from_reader("{ not json".as_bytes()).unwrap_err();
        assert!(matches!(err, GraphError::Snapshot(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_snapshot("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GraphError::Snapshot(msg) if msg.contains("not/here.json")));
    }
}
