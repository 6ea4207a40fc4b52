//! Persistence listeners.
//!
//! Savers are how graphs reach durable storage without the graph layer
//! knowing anything about storage. Every mutating graph operation produces a
//! [`GraphChange`] and hands it, with the graph, to each attached saver. A
//! saver that fails is logged and skipped; the in-memory mutation stands.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::AlignmentGraph;

/// What just changed, attached to every saver notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GraphChange {
    /// Column nodes were created from worksheet headers.
    Seeded { column_ids: Vec<String> },
    /// A prediction run replaced a column's suggestion list.
    SuggestionsApplied { column_id: String, count: usize },
    /// A semantic type was confirmed on a column.
    TypeConfirmed { column_id: String },
}

/// Capability to persist a graph when it changes.
pub trait AlignmentSaver: Send + Sync {
    fn on_graph_changed(
        &self,
        graph: &AlignmentGraph,
        change: &GraphChange,
    ) -> anyhow::Result<()>;
}

/// Writes each changed graph as pretty JSON to
/// `<dir>/<sanitized canonical key>.json`, replacing the previous snapshot.
pub struct JsonFileSaver {
    dir: PathBuf,
}

impl JsonFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file a given graph is saved to.
    pub fn file_for(&self, graph: &AlignmentGraph) -> PathBuf {
        self.dir
            .join(format!("{}.json", sanitize(&graph.key().canonical())))
    }
}

impl AlignmentSaver for JsonFileSaver {
    fn on_graph_changed(
        &self,
        graph: &AlignmentGraph,
        _change: &GraphChange,
    ) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&graph.snapshot())?;
        fs::write(self.file_for(graph), json)?;
        Ok(())
    }
}

/// Keeps alphanumerics, `_` and `-`; everything else becomes `_`. Canonical
/// keys contain `:`, which most filesystems tolerate but Windows does not.
fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
