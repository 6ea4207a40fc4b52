//! Parent/child structure over triples maps.
//!
//! Mapping generation emits triples maps parents-first, so the auxiliary
//! model keeps their reference structure as a small directed graph and
//! derives a deterministic emission order from it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One parent-to-child reference: the parent's subject reaches the child's
/// subject through `predicate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplesMapLink {
    pub parent: String,
    pub child: String,
    pub predicate: String,
}

/// Directed graph over triples-map ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriplesMapGraph {
    maps: BTreeSet<String>,
    links: Vec<TriplesMapLink>,
}

impl TriplesMapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_map(&mut self, id: impl Into<String>) {
        self.maps.insert(id.into());
    }

    /// Records a parent-to-child reference, registering both endpoints if
    /// they are new. An exact duplicate link is kept once.
    pub fn link(&mut self, parent: &str, child: &str, predicate: &str) {
        self.maps.insert(parent.to_owned());
        self.maps.insert(child.to_owned());
        let link = TriplesMapLink {
            parent: parent.to_owned(),
            child: child.to_owned(),
            predicate: predicate.to_owned(),
        };
        if !self.links.contains(&link) {
            self.links.push(link);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.contains(id)
    }

    /// All map ids, sorted.
    pub fn maps(&self) -> impl Iterator<Item = &str> {
        self.maps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn links(&self) -> &[TriplesMapLink] {
        &self.links
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|l| l.parent == id)
            .map(|l| l.child.as_str())
            .collect()
    }

    pub fn parents_of(&self, id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|l| l.child == id)
            .map(|l| l.parent.as_str())
            .collect()
    }

    /// Maps no link points at, sorted.
    pub fn roots(&self) -> Vec<&str> {
        self.maps
            .iter()
            .map(String::as_str)
            .filter(|m| !self.links.iter().any(|l| l.child == *m))
            .collect()
    }

    /// A deterministic parents-first order over every map.
    ///
    /// Kahn's algorithm, always taking the lexicographically smallest ready
    /// map. If the graph has a cycle, the maps stuck in it are appended in
    /// sorted order after a warning; generation still terminates and every
    /// map appears exactly once.
    pub fn generation_order(&self) -> Vec<String> {
        let mut indegree: BTreeMap<&str, usize> =
            self.maps.iter().map(|m| (m.as_str(), 0usize)).collect();
        for link in &self.links {
            if let Some(d) = indegree.get_mut(link.child.as_str()) {
                *d += 1;
            }
        }

        let mut ready: BTreeSet<&str> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(&m, _)| m)
            .collect();
        let mut order = Vec::with_capacity(self.maps.len());
        while let Some(&next) = ready.iter().next() {
            ready.remove(next);
            order.push(next.to_owned());
            for link in &self.links {
                if link.parent == next {
                    if let Some(d) = indegree.get_mut(link.child.as_str()) {
                        *d -= 1;
                        if *d == 0 {
                            ready.insert(link.child.as_str());
                        }
                    }
                }
            }
        }

        if order.len() < self.maps.len() {
            let placed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
            let leftover: Vec<&str> = self
                .maps
                .iter()
                .map(String::as_str)
                .filter(|m| !placed.contains(m))
                .collect();
            tracing::warn!(
                stuck = leftover.len(),
                "triples map graph has a cycle; appending remaining maps in sorted order"
            );
            order.extend(leftover.into_iter().map(str::to_owned));
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_registers_endpoints() {
        let mut g = TriplesMapGraph::new();
        g.link("t1", "t2", "ex:address");
        assert!(g.contains("t1"));
        assert!(g.contains("t2"));
        assert_eq!(g.len(), 2);

        // Exact duplicates collapse.
        g.link("t1", "t2", "ex:address");
        assert_eq!(g.links().len(), 1);
        // Same endpoints with another predicate is a distinct link.
        g.link("t1", "t2", "ex:billing");
        assert_eq!(g.links().len(), 2);
    }

    #[test]
    fn neighbors_and_roots() {
        let mut g = TriplesMapGraph::new();
        g.link("t1", "t2", "p");
        g.link("t1", "t3", "p");
        g.link("t2", "t4", "p");
        g.add_map("lonely");

        assert_eq!(g.children_of("t1"), vec!["t2", "t3"]);
        assert_eq!(g.parents_of("t4"), vec!["t2"]);
        assert!(g.children_of("t4").is_empty());
        assert_eq!(g.roots(), vec!["lonely", "t1"]);
    }

    #[test]
    fn generation_order_is_topological() {
        let mut g = TriplesMapGraph::new();
        g.link("t1", "t2", "p");
        g.link("t1", "t3", "p");
        g.link("t3", "t4", "p");

        let order = g.generation_order();
        assert_eq!(order.len(), 4);
        let pos = |id: &str| order.iter().position(|m| m == id).unwrap();
        assert!(pos("t1") < pos("t2"));
        assert!(pos("t1") < pos("t3"));
        assert!(pos("t3") < pos("t4"));
        // Deterministic: smallest ready map first.
        assert_eq!(order, vec!["t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn cycle_still_yields_every_map_once() {
        let mut g = TriplesMapGraph::new();
        g.link("a", "b", "p");
        g.link("b", "c", "p");
        g.link("c", "b", "p"); // b <-> c cycle
        g.add_map("z");

        let order = g.generation_order();
        assert_eq!(order.len(), 4);
        let mut sorted = order.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
        // Acyclic part first, then the stuck maps in sorted order.
        assert_eq!(order[0], "a");
        assert_eq!(&order[2..], ["b", "c"]);
    }

    #[test]
    fn empty_graph_orders_nothing() {
        assert!(TriplesMapGraph::new().generation_order().is_empty());
    }
}
