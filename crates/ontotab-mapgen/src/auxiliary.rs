//! The per-mapping auxiliary model.
//!
//! While an RDF mapping is generated from an alignment graph, a
//! [`MappingAuxInfo`] accumulates everything the generation stage needs
//! beyond the graph itself: how triples maps reference each other, which
//! columns each blank node covers, the URI prefixes assigned to blank nodes,
//! which predicate-object links touch a column, and finally the template
//! anchor chosen for every blank node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::anchor::select_template_anchor;
use crate::error::MapgenError;
use crate::triples_graph::TriplesMapGraph;

pub type BlankNodeId = String;
pub type TriplesMapId = String;
pub type SubjectMapId = String;

/// What the object position of a predicate-object link refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectRef {
    /// A worksheet column, by canonical column path.
    Column(String),
    /// A literal constant.
    Constant(String),
    /// The subject of another triples map.
    TriplesMap(TriplesMapId),
}

/// One predicate-object entry of a triples map, indexed by the column it
/// touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateObjectLink {
    pub triples_map: TriplesMapId,
    pub predicate: String,
    pub object: ObjectRef,
}

/// Outcome of [`MappingAuxInfo::assign_template_anchors`]: decisions in
/// blank-node id order, plus the nodes that could not be anchored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorReport {
    pub assigned: Vec<(SubjectMapId, String)>,
    pub failed: Vec<MapgenError>,
}

impl AnchorReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Side tables for one mapping-generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingAuxInfo {
    triples_map_graph: TriplesMapGraph,
    blank_node_coverage: BTreeMap<BlankNodeId, Vec<String>>,
    blank_node_uri_prefixes: BTreeMap<BlankNodeId, String>,
    column_links: BTreeMap<String, Vec<PredicateObjectLink>>,
    template_anchors: BTreeMap<SubjectMapId, String>,
}

impl MappingAuxInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triples_map_graph(&self) -> &TriplesMapGraph {
        &self.triples_map_graph
    }

    pub fn triples_map_graph_mut(&mut self) -> &mut TriplesMapGraph {
        &mut self.triples_map_graph
    }

    /// Ensures the blank node has a coverage entry, possibly empty. An empty
    /// entry is legal here and only fails at anchor time.
    pub fn declare_blank_node(&mut self, blank_node: impl Into<BlankNodeId>) {
        self.blank_node_coverage.entry(blank_node.into()).or_default();
    }

    /// Appends a covered column path, keeping declaration order.
    pub fn record_coverage(
        &mut self,
        blank_node: impl Into<BlankNodeId>,
        column_path: impl Into<String>,
    ) {
        self.blank_node_coverage
            .entry(blank_node.into())
            .or_default()
            .push(column_path.into());
    }

    pub fn coverage_of(&self, blank_node: &str) -> Option<&[String]> {
        self.blank_node_coverage.get(blank_node).map(Vec::as_slice)
    }

    /// Covered blank-node ids, sorted.
    pub fn covered_blank_nodes(&self) -> impl Iterator<Item = &str> {
        self.blank_node_coverage.keys().map(String::as_str)
    }

    pub fn set_uri_prefix(
        &mut self,
        blank_node: impl Into<BlankNodeId>,
        prefix: impl Into<String>,
    ) {
        self.blank_node_uri_prefixes
            .insert(blank_node.into(), prefix.into());
    }

    pub fn uri_prefix_of(&self, blank_node: &str) -> Option<&str> {
        self.blank_node_uri_prefixes
            .get(blank_node)
            .map(String::as_str)
    }

    /// Appends a predicate-object link under the column it touches, keeping
    /// declaration order; generation iterates these deterministically.
    pub fn link_column(&mut self, column_name: impl Into<String>, link: PredicateObjectLink) {
        self.column_links
            .entry(column_name.into())
            .or_default()
            .push(link);
    }

    pub fn links_for_column(&self, column_name: &str) -> Option<&[PredicateObjectLink]> {
        self.column_links.get(column_name).map(Vec::as_slice)
    }

    pub fn template_anchor(&self, subject_map: &str) -> Option<&str> {
        self.template_anchors.get(subject_map).map(String::as_str)
    }

    /// Chooses an anchor for every covered blank node, in id order, and
    /// stores the decisions. A node with empty coverage is reported as
    /// failed without stopping the rest.
    pub fn assign_template_anchors(&mut self) -> AnchorReport {
        let mut report = AnchorReport::default();
        for (blank_node, columns) in &self.blank_node_coverage {
            match select_template_anchor(columns.iter().map(String::as_str)) {
                Some(anchor) => report
                    .assigned
                    .push((blank_node.clone(), anchor.to_owned())),
                None => report
                    .failed
                    .push(MapgenError::EmptyCoverage(blank_node.clone())),
            }
        }
        for (subject_map, anchor) in &report.assigned {
            self.template_anchors
                .insert(subject_map.clone(), anchor.clone());
        }
        report
    }

    /// Pre-flight for the generation stage: every covered blank node must
    /// hold an anchor. Names the first violator in id order.
    pub fn verify_anchors_assigned(&self) -> Result<(), MapgenError> {
        for blank_node in self.blank_node_coverage.keys() {
            if !self.template_anchors.contains_key(blank_node) {
                return Err(MapgenError::MissingAnchor(blank_node.clone()));
            }
        }
        Ok(())
    }
}
