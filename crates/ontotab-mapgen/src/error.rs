use thiserror::Error;

/// Failures of the mapping side tables. Both are per-blank-node conditions:
/// one bad node never aborts work on the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapgenError {
    /// The blank node covers no columns, so no anchor can be chosen for it.
    #[error("blank node {0} covers no columns")]
    EmptyCoverage(String),
    /// Generation pre-flight found a covered blank node without an anchor.
    #[error("no template anchor assigned for {0}")]
    MissingAnchor(String),
}
