//! The per-worksheet alignment graph.
//!
//! An [`AlignmentGraph`] holds one node per worksheet column plus the class
//! and property nodes materialized when semantic types are confirmed. The
//! graph is shared between its creator, any number of readers, and at most
//! one in-flight prediction run per column, so all state lives behind a
//! single `RwLock` and every method takes `&self`.
//!
//! Mutations notify attached savers after the write lock is released; the
//! lock is not re-entrant and a saver is allowed to read the graph back.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use ontotab_rep::HeaderPath;

use crate::key::AlignmentKey;
use crate::node::{local_name, ClassNode, ColumnNode, Node, PropertyNode, SemanticEdge};
use crate::ontology::OntologyContext;
use crate::predict::ColumnRef;
use crate::saver::{AlignmentSaver, GraphChange};
use crate::semantic_type::SemanticType;

/// Result of a mutation addressed to a named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// The column exists and was updated.
    Applied,
    /// No such column; the graph is unchanged. Expected when the worksheet
    /// changed between scheduling and completion of a prediction run.
    UnknownColumn,
}

#[derive(Default)]
struct GraphInner {
    nodes: BTreeMap<String, Node>,
    edges: Vec<SemanticEdge>,
    /// Column ids claimed by a scheduled-but-unfinished prediction run.
    pending: HashSet<String>,
    revision: u64,
}

/// Serializable capture of a graph's state, what savers persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub key: AlignmentKey,
    pub ontology_id: String,
    pub created_at: DateTime<Utc>,
    pub revision: u64,
    pub nodes: Vec<Node>,
    pub edges: Vec<SemanticEdge>,
}

/// The semantic graph of one worksheet.
pub struct AlignmentGraph {
    key: AlignmentKey,
    ontology: OntologyContext,
    created_at: DateTime<Utc>,
    inner: RwLock<GraphInner>,
    savers: RwLock<Vec<Arc<dyn AlignmentSaver>>>,
}

impl std::fmt::Debug for AlignmentGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentGraph")
            .field("key", &self.key)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl AlignmentGraph {
    pub fn new(key: AlignmentKey, ontology: OntologyContext) -> Self {
        Self {
            key,
            ontology,
            created_at: Utc::now(),
            inner: RwLock::new(GraphInner::default()),
            savers: RwLock::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &AlignmentKey {
        &self.key
    }

    pub fn ontology(&self) -> &OntologyContext {
        &self.ontology
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Bumped by every mutating operation.
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Adds a column node, or returns the existing node if the id is already
    /// present. A second call never resets state the first call (or anything
    /// after it) established.
    pub fn add_column_node(
        &self,
        id: &str,
        name: &str,
        confirmed: Option<SemanticType>,
        suggestions: Vec<SemanticType>,
    ) -> Node {
        let node = {
            let mut inner = self.inner.write();
            if let Some(existing) = inner.nodes.get(id) {
                return existing.clone();
            }
            let node = Node::Column(ColumnNode {
                id: id.to_owned(),
                name: name.to_owned(),
                suggestions,
                confirmed,
            });
            inner.nodes.insert(id.to_owned(), node.clone());
            inner.revision += 1;
            node
        };
        self.notify(&GraphChange::Seeded {
            column_ids: vec![id.to_owned()],
        });
        node
    }

    /// Replaces the suggestion list of a column and releases its pending
    /// claim. Unknown columns leave the graph untouched.
    pub fn apply_suggestions(
        &self,
        column_id: &str,
        suggestions: Vec<SemanticType>,
    ) -> SuggestionOutcome {
        let count = suggestions.len();
        let outcome = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            inner.pending.remove(column_id);
            match inner.nodes.get_mut(column_id) {
                Some(Node::Column(col)) => {
                    col.suggestions = suggestions;
                    inner.revision += 1;
                    SuggestionOutcome::Applied
                }
                _ => SuggestionOutcome::UnknownColumn,
            }
        };
        if outcome == SuggestionOutcome::Applied {
            tracing::debug!(key = %self.key, column = %column_id, count, "applied suggestions");
            self.notify(&GraphChange::SuggestionsApplied {
                column_id: column_id.to_owned(),
                count,
            });
        }
        outcome
    }

    /// Records the confirmed semantic type of a column, materializing the
    /// class and property nodes it references and the connecting edge.
    pub fn confirm_semantic_type(
        &self,
        column_id: &str,
        semantic_type: SemanticType,
    ) -> SuggestionOutcome {
        {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            let Some(Node::Column(col)) = inner.nodes.get_mut(column_id) else {
                return SuggestionOutcome::UnknownColumn;
            };
            col.confirmed = Some(semantic_type.clone());

            let class_id = semantic_type.class_uri.clone();
            inner.nodes.entry(class_id.clone()).or_insert_with(|| {
                Node::Class(ClassNode {
                    label: local_name(&class_id),
                    id: class_id.clone(),
                })
            });
            let property_id = semantic_type.property_uri.clone();
            inner.nodes.entry(property_id.clone()).or_insert_with(|| {
                Node::Property(PropertyNode {
                    label: local_name(&property_id),
                    id: property_id.clone(),
                })
            });

            let edge = SemanticEdge {
                column_id: column_id.to_owned(),
                class_id: semantic_type.class_uri.clone(),
                property_uri: semantic_type.property_uri.clone(),
            };
            if !inner.edges.contains(&edge) {
                inner.edges.push(edge);
            }
            inner.revision += 1;
        }
        self.notify(&GraphChange::TypeConfirmed {
            column_id: column_id.to_owned(),
        });
        SuggestionOutcome::Applied
    }

    /// Attaches a persistence listener. Attaching the same saver twice keeps
    /// a single registration.
    pub fn attach_saver(&self, saver: Arc<dyn AlignmentSaver>) {
        let mut savers = self.savers.write();
        if !savers.iter().any(|s| Arc::ptr_eq(s, &saver)) {
            savers.push(saver);
        }
    }

    /// Seeds a node for every path whose leaf column is new, and claims every
    /// column that still has no suggestions and no in-flight run. One lock
    /// acquisition covers the whole scan, so two racing callers split the
    /// columns between them instead of both scheduling the full set.
    pub(crate) fn plan_predictions(&self, paths: &[HeaderPath]) -> Vec<ColumnRef> {
        let mut work = Vec::new();
        let mut seeded = Vec::new();
        {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            for path in paths {
                let leaf = path.leaf();
                let needs_prediction = match inner.nodes.get(&leaf.id) {
                    None => {
                        inner.nodes.insert(
                            leaf.id.clone(),
                            Node::Column(ColumnNode::new(leaf.id.clone(), leaf.name.clone())),
                        );
                        inner.revision += 1;
                        seeded.push(leaf.id.clone());
                        true
                    }
                    Some(Node::Column(col)) => !col.has_suggestions(),
                    Some(_) => false,
                };
                if needs_prediction && inner.pending.insert(leaf.id.clone()) {
                    work.push(ColumnRef {
                        id: leaf.id.clone(),
                        name: leaf.name.clone(),
                        path: path.column_path(),
                    });
                }
            }
        }
        if !seeded.is_empty() {
            tracing::debug!(
                key = %self.key,
                seeded = seeded.len(),
                claimed = work.len(),
                "seeded column nodes"
            );
            self.notify(&GraphChange::Seeded { column_ids: seeded });
        }
        work
    }

    /// Releases a pending claim without applying suggestions, so a later
    /// scan can reschedule the column.
    pub(crate) fn clear_pending(&self, column_id: &str) {
        self.inner.write().pending.remove(column_id);
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.inner.read().pending.len()
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn node_by_id(&self, id: &str) -> Option<Node> {
        self.inner.read().nodes.get(id).cloned()
    }

    /// Ids of all column nodes, in sorted order.
    pub fn column_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .nodes
            .values()
            .filter_map(|n| n.as_column().map(|c| c.id.clone()))
            .collect()
    }

    pub fn suggestions_for(&self, column_id: &str) -> Option<Vec<SemanticType>> {
        let inner = self.inner.read();
        match inner.nodes.get(column_id) {
            Some(Node::Column(col)) => Some(col.suggestions.clone()),
            _ => None,
        }
    }

    /// Columns with a confirmed semantic type, in sorted id order.
    pub fn confirmed_columns(&self) -> Vec<(String, SemanticType)> {
        self.inner
            .read()
            .nodes
            .values()
            .filter_map(|n| {
                let col = n.as_column()?;
                let confirmed = col.confirmed.clone()?;
                Some((col.id.clone(), confirmed))
            })
            .collect()
    }

    pub fn edges(&self) -> Vec<SemanticEdge> {
        self.inner.read().edges.clone()
    }

    /// Number of nodes of any kind.
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().nodes.is_empty()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let inner = self.inner.read();
        GraphSnapshot {
            key: self.key.clone(),
            ontology_id: self.ontology.id().to_owned(),
            created_at: self.created_at,
            revision: inner.revision,
            nodes: inner.nodes.values().cloned().collect(),
            edges: inner.edges.clone(),
        }
    }

    /// Fans a change out to the attached savers. A saver failure is logged
    /// and does not roll back the mutation.
    fn notify(&self, change: &GraphChange) {
        let savers: Vec<Arc<dyn AlignmentSaver>> = self.savers.read().clone();
        for saver in savers {
            if let Err(err) = saver.on_graph_changed(self, change) {
                tracing::warn!(key = %self.key, error = %err, "alignment saver failed");
            }
        }
    }
}
