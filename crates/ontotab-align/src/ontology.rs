//! Ontology handle.
//!
//! The alignment layer never inspects the ontology; it only threads a handle
//! from graph construction through to the classifier. The handle is
//! `Arc`-backed so graphs and prediction runs can share it freely.

use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct OntologyInner {
    id: String,
}

/// Opaque, cheaply cloneable reference to a loaded ontology.
#[derive(Debug, Clone)]
pub struct OntologyContext {
    inner: Arc<OntologyInner>,
}

impl OntologyContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(OntologyInner { id: id.into() }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }
}

impl fmt::Display for OntologyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
