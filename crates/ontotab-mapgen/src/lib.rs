//! Auxiliary model for RDF mapping generation.
//!
//! The alignment graph says what each column means; this crate carries the
//! structural side tables needed to serialize rows from it:
//!
//! - [`TriplesMapGraph`]: how triples maps reference each other, with a
//!   deterministic parents-first [`generation order`](TriplesMapGraph::generation_order)
//! - [`MappingAuxInfo`]: blank-node column coverage, URI prefixes, and the
//!   per-column predicate-object link index
//! - [`select_template_anchor`]: the rule that picks the grouping key for a
//!   blank node, the deepest-nested covered column
//!
//! RDF serialization itself lives downstream; this crate only prepares and
//! validates its inputs.

pub mod anchor;
pub mod auxiliary;
pub mod error;
pub mod triples_graph;

pub use anchor::select_template_anchor;
pub use auxiliary::{
    AnchorReport, BlankNodeId, MappingAuxInfo, ObjectRef, PredicateObjectLink, SubjectMapId,
    TriplesMapId,
};
pub use error::MapgenError;
pub use triples_graph::{TriplesMapGraph, TriplesMapLink};
