//! Worksheet header tables.
//!
//! A worksheet's columns form an ordered forest: a header either carries
//! values directly (a leaf column) or contains a nested table of child
//! headers (repeated records). Alignment and mapping code never walks the
//! forest itself; it consumes [`HeaderPath`]s, the root-to-leaf segment lists
//! in declaration order, and the [`ColumnPath`] encoding derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column_path::ColumnPath;
use crate::error::RepError;

/// One header in a worksheet, possibly containing a nested table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    /// Stable column id, unique within the worksheet.
    pub id: String,
    /// Display name shown to users and used in column paths.
    pub name: String,
    /// Child headers of the nested table; empty for a leaf column.
    #[serde(default)]
    pub children: Vec<Header>,
}

impl Header {
    /// A leaf column.
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// A header containing a nested table.
    pub fn nested(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<Header>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One segment of a header path: the id and display name of a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSegment {
    pub id: String,
    pub name: String,
}

/// A root-to-leaf path through a worksheet's header forest. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPath {
    segments: Vec<HeaderSegment>,
}

impl HeaderPath {
    /// Build a path from segments; at least one segment is required.
    pub fn from_segments(segments: Vec<HeaderSegment>) -> Result<Self, RepError> {
        if segments.is_empty() {
            return Err(RepError::EmptyHeaderPath);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[HeaderSegment] {
        &self.segments
    }

    /// The leaf column this path names.
    pub fn leaf(&self) -> &HeaderSegment {
        self.segments.last().expect("header path is never empty")
    }

    /// The canonical column-path encoding of this path: the flat name for a
    /// top-level column, the bracketed segment-name list otherwise.
    pub fn column_path(&self) -> ColumnPath {
        if self.segments.len() == 1 {
            ColumnPath::Flat(self.segments[0].name.clone())
        } else {
            ColumnPath::nested(self.segments.iter().map(|s| s.name.clone()))
        }
    }
}

impl fmt::Display for HeaderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.segments.iter().map(|s| s.name.as_str()).collect();
        f.write_str(&names.join("/"))
    }
}

/// The ordered header forest of one worksheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Headers {
    roots: Vec<Header>,
}

impl Headers {
    pub fn new(roots: Vec<Header>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Header] {
        &self.roots
    }

    /// All root-to-leaf paths, in declaration order.
    pub fn all_paths(&self) -> Vec<HeaderPath> {
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        for root in &self.roots {
            collect_paths(root, &mut prefix, &mut paths);
        }
        paths
    }

    /// Leaf paths of the subtree rooted at `header_id`, segments starting at
    /// that header. Absent if no header has that id.
    pub fn paths_under(&self, header_id: &str) -> Option<Vec<HeaderPath>> {
        let header = self.find(header_id)?;
        let mut paths = Vec::new();
        let mut prefix = Vec::new();
        collect_paths(header, &mut prefix, &mut paths);
        Some(paths)
    }

    /// Depth-first lookup of a header by id.
    pub fn find(&self, header_id: &str) -> Option<&Header> {
        fn walk<'a>(header: &'a Header, id: &str) -> Option<&'a Header> {
            if header.id == id {
                return Some(header);
            }
            header.children.iter().find_map(|child| walk(child, id))
        }
        self.roots.iter().find_map(|root| walk(root, header_id))
    }

    pub fn leaf_count(&self) -> usize {
        fn count(header: &Header) -> usize {
            if header.is_leaf() {
                1
            } else {
                header.children.iter().map(count).sum()
            }
        }
        self.roots.iter().map(count).sum()
    }
}

fn collect_paths(header: &Header, prefix: &mut Vec<HeaderSegment>, out: &mut Vec<HeaderPath>) {
    prefix.push(HeaderSegment {
        id: header.id.clone(),
        name: header.name.clone(),
    });
    if header.is_leaf() {
        out.push(HeaderPath {
            segments: prefix.clone(),
        });
    } else {
        for child in &header.children {
            collect_paths(child, prefix, out);
        }
    }
    prefix.pop();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people_headers() -> Headers {
        Headers::new(vec![
            Header::leaf("h1", "title"),
            Header::nested(
                "h2",
                "people",
                vec![
                    Header::leaf("h3", "name"),
                    Header::nested(
                        "h4",
                        "address",
                        vec![Header::leaf("h5", "city"), Header::leaf("h6", "zip")],
                    ),
                ],
            ),
        ])
    }

    #[test]
    fn all_paths_in_declaration_order() {
        let headers = people_headers();
        let paths = headers.all_paths();
        let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "title",
                "people/name",
                "people/address/city",
                "people/address/zip",
            ]
        );
        assert_eq!(headers.leaf_count(), 4);
    }

    #[test]
    fn column_paths_flat_or_bracketed() {
        let headers = people_headers();
        let paths = headers.all_paths();
        assert_eq!(paths[0].column_path().to_string(), "title");
        assert_eq!(paths[3].column_path().to_string(), "[people,address,zip]");
        assert_eq!(paths[3].column_path().depth(), 2);
    }

    #[test]
    fn leaf_exposes_id_and_name() {
        let headers = people_headers();
        let paths = headers.all_paths();
        assert_eq!(paths[1].leaf().id, "h3");
        assert_eq!(paths[1].leaf().name, "name");
    }

    #[test]
    fn paths_under_scopes_to_subtree() {
        let headers = people_headers();
        let under = headers.paths_under("h4").unwrap();
        let rendered: Vec<String> = under.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["address/city", "address/zip"]);
        assert!(headers.paths_under("nope").is_none());
    }

    #[test]
    fn empty_paths_are_rejected() {
        assert!(matches!(
            HeaderPath::from_segments(vec![]),
            Err(RepError::EmptyHeaderPath)
        ));
    }

    #[test]
    fn headers_round_trip_through_json() {
        let headers = people_headers();
        let json = serde_json::to_string(&headers).unwrap();
        let back: Headers = serde_json::from_str(&json).unwrap();
        assert_eq!(back.leaf_count(), headers.leaf_count());
        assert_eq!(
            back.all_paths()[2].column_path(),
            headers.all_paths()[2].column_path()
        );
    }
}
