use std::collections::BTreeMap;

use log::{trace, warn};
use serde::{Deserialize, Serialize};

/// Undirected weighted graph over string node ids.
///
/// Stored as adjacency maps mirrored in both directions, so
/// `adj[a][b] == adj[b][a]` for every edge. Node and edge iteration is
/// ordered (ascending id) and therefore deterministic.
///
/// Invariants:
/// - no self-loops
/// - at most one edge per unordered pair; re-adding a pair overwrites its weight
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    adj: BTreeMap<String, BTreeMap<String, f64>>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; no-op if it already exists.
    pub fn add_node(&mut self, id: impl Into<String>) {
        self.adj.entry(id.into()).or_default();
    }

    pub fn add_nodes_from<S, T>(&mut self, ids: T)
    where
        S: Into<String>,
        T: IntoIterator<Item = S>,
    {
        for id in ids {
            self.add_node(id);
        }
    }

    /// Add (or overwrite) the undirected edge `a -- b`, creating missing
    /// endpoints. Self-loops are ignored.
    pub fn add_weighted_edge(&mut self, a: &str, b: &str, weight: f64) {
        if a == b {
            warn!("Ignoring self-loop on '{}'", a);
            return;
        }
        if let Some(old) = self.weight(a, b) {
            trace!("Overwriting edge {} -- {}: {} -> {}", a, b, old, weight);
        }
        self.adj.entry(a.to_owned()).or_default().insert(b.to_owned(), weight);
        self.adj.entry(b.to_owned()).or_default().insert(a.to_owned(), weight);
    }

    pub fn add_weighted_edges_from<T>(&mut self, edges: T)
    where
        T: IntoIterator<Item = (String, String, f64)>,
    {
        for (a, b, w) in edges {
            self.add_weighted_edge(&a, &b, w);
        }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.adj.contains_key(id)
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.weight(a, b).is_some()
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        self.adj.get(a).and_then(|n| n.get(b)).copied()
    }

    /// Neighbours of `id` with edge weights, ascending by neighbour id.
    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.adj
            .get(id)
            .into_iter()
            .flat_map(|n| n.iter().map(|(k, &w)| (k.as_str(), w)))
    }

    /// Number of incident edges; 0 for unknown nodes.
    pub fn degree(&self, id: &str) -> usize {
        self.adj.get(id).map(BTreeMap::len).unwrap_or(0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.adj.keys().map(String::as_str)
    }

    /// Every edge once, as `(a, b, weight)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.adj.iter().flat_map(|(a, nbrs)| {
            nbrs.iter()
                .filter(move |(b, _)| a < *b)
                .map(move |(b, &w)| (a.as_str(), b.as_str(), w))
        })
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Drop every node without incident edges, returning how many were removed.
    pub fn remove_isolated_nodes(&mut self) -> usize {
        let before = self.adj.len();
        self.adj.retain(|_, nbrs| !nbrs.is_empty());
        before - self.adj.len()
    }
}
