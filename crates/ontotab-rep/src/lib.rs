//! Worksheet representation for the alignment stack.
//!
//! This crate owns the structural view of tabular sources that the alignment
//! and mapping layers consume:
//!
//! - [`Headers`] / [`HeaderPath`]: the ordered header forest of a worksheet
//!   and its root-to-leaf paths
//! - [`ColumnPath`]: the canonical string encoding of a column's position,
//!   flat for top-level columns and bracketed for nested ones
//! - [`WorksheetProvider`] / [`InMemoryCatalog`]: the seam through which
//!   alignment fetches worksheet structure
//!
//! Nothing here knows about ontologies or graphs; those live downstream.

pub mod catalog;
pub mod column_path;
pub mod error;
pub mod headers;

pub use catalog::{InMemoryCatalog, Worksheet, WorksheetProvider};
pub use column_path::ColumnPath;
pub use error::RepError;
pub use headers::{Header, HeaderPath, HeaderSegment, Headers};
