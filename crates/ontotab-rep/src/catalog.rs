//! Worksheet catalog.
//!
//! [`WorksheetProvider`] is the seam between alignment and whatever owns the
//! actual worksheet data: the graph layer asks for header paths by worksheet
//! id and nothing else. [`InMemoryCatalog`] is the in-process implementation
//! used by services and tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::RepError;
use crate::headers::{HeaderPath, Headers};

/// One worksheet: an id, a human title, and its header forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: String,
    pub title: String,
    pub headers: Headers,
}

impl Worksheet {
    pub fn new(id: impl Into<String>, title: impl Into<String>, headers: Headers) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            headers,
        }
    }
}

/// Source of worksheet structure for the alignment layer.
pub trait WorksheetProvider: Send + Sync {
    /// All root-to-leaf header paths of the worksheet, in declaration order.
    fn header_paths(&self, worksheet_id: &str) -> Result<Vec<HeaderPath>, RepError>;
}

/// Worksheets held in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryCatalog {
    worksheets: RwLock<HashMap<String, Arc<Worksheet>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a worksheet.
    pub fn put(&self, worksheet: Worksheet) {
        self.worksheets
            .write()
            .insert(worksheet.id.clone(), Arc::new(worksheet));
    }

    pub fn get(&self, worksheet_id: &str) -> Option<Arc<Worksheet>> {
        self.worksheets.read().get(worksheet_id).cloned()
    }

    pub fn remove(&self, worksheet_id: &str) -> Option<Arc<Worksheet>> {
        self.worksheets.write().remove(worksheet_id)
    }

    pub fn len(&self) -> usize {
        self.worksheets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.worksheets.read().is_empty()
    }
}

impl WorksheetProvider for InMemoryCatalog {
    fn header_paths(&self, worksheet_id: &str) -> Result<Vec<HeaderPath>, RepError> {
        let worksheet = self
            .get(worksheet_id)
            .ok_or_else(|| RepError::UnknownWorksheet(worksheet_id.to_string()))?;
        Ok(worksheet.headers.all_paths())
    }
}
