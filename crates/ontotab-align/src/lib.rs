//! Alignment graphs for tabular-to-ontology mapping.
//!
//! Every worksheet being mapped gets one [`AlignmentGraph`]: a node per
//! column, plus the class/property nodes and edges produced by confirming
//! semantic types. Graphs live in a process-wide [`AlignmentRegistry`] keyed
//! by `(workspace, worksheet)`; asking for a missing graph creates it,
//! seeds it from the worksheet's headers, and kicks off a background
//! prediction run that fills in suggested semantic types for columns that
//! have none. Suggestions arriving later is the normal case, not an error:
//! readers must expect empty suggestion lists.
//!
//! Persistence is listener-based: [`AlignmentSaver`]s attached through the
//! registry are told about every graph mutation. [`JsonFileSaver`] is the
//! bundled implementation.
//!
//! The classifier behind the predictions is external; anything implementing
//! [`SemanticTypeClassifier`] plugs in at registry construction.

pub mod error;
pub mod graph;
pub mod key;
pub mod node;
pub mod ontology;
pub mod predict;
pub mod registry;
pub mod saver;
pub mod semantic_type;


pub use error::AlignError;
pub use graph::{AlignmentGraph, GraphSnapshot, SuggestionOutcome};
pub use key::AlignmentKey;
pub use node::{ClassNode, ColumnNode, Node, PropertyNode, SemanticEdge};
pub use ontology::OntologyContext;
pub use predict::{ClassifierError, ColumnRef, RunReport, RunState, SemanticTypeClassifier};
pub use registry::{AlignmentRegistry, RegistryConfig};
pub use saver::{AlignmentSaver, GraphChange, JsonFileSaver};
pub use semantic_type::{SemanticType, TypeOrigin};
