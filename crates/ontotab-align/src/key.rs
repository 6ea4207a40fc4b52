//! Registry keys.
//!
//! A graph is keyed by `(workspace, worksheet)`. The canonical string form is
//! `"{workspace}:{worksheet}AL"`, kept for compatibility with stored ids;
//! [`AlignmentKey::parse`] is its inverse. The encoding is ambiguous for ids
//! that contain `:` or the literal `AL` after the first colon, so parsing
//! recovers the original ids only for ids free of those substrings. New code
//! should pass ids, not canonical strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one alignment graph: a worksheet within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentKey {
    pub workspace_id: String,
    pub worksheet_id: String,
}

impl AlignmentKey {
    pub fn new(workspace_id: impl Into<String>, worksheet_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            worksheet_id: worksheet_id.into(),
        }
    }

    /// The canonical string form, `"{workspace}:{worksheet}AL"`.
    pub fn canonical(&self) -> String {
        format!("{}:{}AL", self.workspace_id, self.worksheet_id)
    }

    /// Inverse of [`canonical`](Self::canonical): the workspace id is
    /// everything before the first `:`, the worksheet id everything between
    /// that colon and the first `AL` at or after it. Returns `None` when
    /// either marker is missing.
    pub fn parse(canonical: &str) -> Option<Self> {
        let colon = canonical.find(':')?;
        let workspace_id = &canonical[..colon];
        let rest = &canonical[colon..];
        let marker = rest.find("AL")?;
        let worksheet_id = &rest[1..marker];
        Some(Self::new(workspace_id, worksheet_id))
    }
}

impl fmt::Display for AlignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workspace_id, self.worksheet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_form_appends_marker() {
        let key = AlignmentKey::new("ws1", "sheet1");
        assert_eq!(key.canonical(), "ws1:sheet1AL");
    }

    #[test]
    fn parse_inverts_canonical() {
        let key = AlignmentKey::new("ws1", "sheet1");
        assert_eq!(AlignmentKey::parse(&key.canonical()), Some(key));
    }

    #[test]
    fn parse_rejects_missing_markers() {
        assert_eq!(AlignmentKey::parse("no-colon-AL"), None);
        assert_eq!(AlignmentKey::parse("ws:no-marker"), None);
    }

    #[test]
    fn empty_worksheet_id_survives() {
        let key = AlignmentKey::new("ws", "");
        assert_eq!(key.canonical(), "ws:AL");
        assert_eq!(AlignmentKey::parse("ws:AL"), Some(key));
    }

    // The marker makes the encoding ambiguous: the first "AL" after the
    // colon wins, so a worksheet id containing "AL" is truncated there.
    #[test]
    fn worksheet_ids_containing_the_marker_truncate() {
        let parsed = AlignmentKey::parse("ws:WALDOAL").unwrap();
        assert_eq!(parsed.workspace_id, "ws");
        assert_eq!(parsed.worksheet_id, "W");
    }

    proptest! {
        // Lowercase ids cannot contain ':' or "AL", so the round trip is
        // exact on this domain.
        #[test]
        fn round_trip_for_marker_free_ids(
            ws in "[a-z][a-z0-9_-]{0,11}",
            sheet in "[a-z][a-z0-9_-]{0,11}",
        ) {
            let key = AlignmentKey::new(ws, sheet);
            prop_assert_eq!(AlignmentKey::parse(&key.canonical()), Some(key));
        }
    }
}
