use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// Missing graphs, nodes, or suggestions are not errors anywhere in this
/// crate; those lookups return `Option`. The registry only fails when a
/// collaborator it depends on fails.
#[derive(Debug, Error)]
pub enum AlignError {
    /// The worksheet provider does not know the requested worksheet.
    #[error("worksheet lookup failed: {0}")]
    Worksheet(#[from] ontotab_rep::RepError),
}
