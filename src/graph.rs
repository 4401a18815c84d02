//! Weighted undirected graph construction.
//!
//! Entity identifiers are opaque strings at the boundary. The builder
//! interns them to dense indices and stores the graph as an arena:
//! per-node adjacency vectors plus a canonical edge list, which keeps the
//! hot loops free of string hashing.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A weighted relationship between two entities.
///
/// `weight` is a relationship strength or confidence and must be finite and
/// non-negative. Parallel edges between the same pair of entities are
/// allowed; their weights are summed when the graph is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Source entity identifier.
    pub from: String,
    /// Target entity identifier.
    pub to: String,
    /// Non-negative relationship weight.
    pub weight: f64,
}

impl Edge {
    /// Create an edge between two entities.
    pub fn new(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

/// Undirected weighted graph in arena form.
///
/// Nodes are dense indices `0..n`. Parallel edges have been merged, the
/// edge list is canonical (`u <= v`, sorted), and each adjacency vector is
/// sorted by neighbor index, so every traversal order is deterministic.
#[derive(Debug, Clone)]
pub(crate) struct WeightedGraph {
    /// Adjacency: node -> sorted [(neighbor, weight)]. A self-loop is a
    /// single diagonal entry.
    adj: Vec<Vec<(usize, f64)>>,
    /// Weighted degree of each node. A self-loop of weight w contributes 2w.
    degrees: Vec<f64>,
    /// Canonical edge list: u <= v, parallel edges merged, sorted by (u, v).
    edges: Vec<(usize, usize, f64)>,
    /// Total edge weight, each edge counted once.
    total_weight: f64,
}

impl WeightedGraph {
    /// Build from index-space edges, merging parallel edges.
    pub(crate) fn from_weighted_edges(n: usize, raw: &[(usize, usize, f64)]) -> Self {
        let mut merged: HashMap<(usize, usize), f64> = HashMap::new();
        for &(a, b, w) in raw {
            let key = if a <= b { (a, b) } else { (b, a) };
            *merged.entry(key).or_insert(0.0) += w;
        }

        let mut edges: Vec<(usize, usize, f64)> = merged
            .into_iter()
            .map(|((u, v), w)| (u, v, w))
            .collect();
        edges.sort_unstable_by_key(|&(u, v, _)| (u, v));

        let mut adj = vec![Vec::new(); n];
        let mut degrees = vec![0.0; n];
        let mut total_weight = 0.0;

        for &(u, v, w) in &edges {
            adj[u].push((v, w));
            if u != v {
                adj[v].push((u, w));
            }
            degrees[u] += w;
            degrees[v] += w;
            total_weight += w;
        }

        Self {
            adj,
            degrees,
            edges,
            total_weight,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.adj.len()
    }

    pub(crate) fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adj[node]
    }

    pub(crate) fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    pub(crate) fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    pub(crate) fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

/// Validate boundary edges and build the index-space graph.
///
/// Returns the graph together with the interned identifiers in first-seen
/// order; `ids[i]` is the entity name of node `i`.
pub(crate) fn build_graph(edges: &[Edge]) -> Result<(WeightedGraph, Vec<String>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ids: Vec<String> = Vec::new();
    let mut raw: Vec<(usize, usize, f64)> = Vec::with_capacity(edges.len());

    for edge in edges {
        if edge.weight < 0.0 {
            return Err(Error::NegativeWeight {
                from: edge.from.clone(),
                to: edge.to.clone(),
                weight: edge.weight,
            });
        }
        if !edge.weight.is_finite() {
            return Err(Error::InvalidParameter {
                name: "weight",
                message: "edge weight must be finite",
            });
        }
        let u = intern(&mut index, &mut ids, &edge.from);
        let v = intern(&mut index, &mut ids, &edge.to);
        raw.push((u, v, edge.weight));
    }

    Ok((WeightedGraph::from_weighted_edges(ids.len(), &raw), ids))
}

fn intern(index: &mut HashMap<String, usize>, ids: &mut Vec<String>, name: &str) -> usize {
    if let Some(&i) = index.get(name) {
        return i;
    }
    let i = ids.len();
    ids.push(name.to_string());
    let _ = index.insert(name.to_string(), i);
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_identifiers_in_first_seen_order() {
        let edges = vec![
            Edge::new("gandalf", "frodo", 1.0),
            Edge::new("frodo", "sam", 2.0),
        ];
        let (graph, ids) = build_graph(&edges).unwrap();

        assert_eq!(ids, vec!["gandalf", "frodo", "sam"]);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn merges_parallel_edges() {
        let edges = vec![
            Edge::new("a", "b", 1.0),
            Edge::new("b", "a", 2.5),
        ];
        let (graph, _) = build_graph(&edges).unwrap();

        assert_eq!(graph.edges(), &[(0, 1, 3.5)]);
        assert_eq!(graph.neighbors(0), &[(1, 3.5)]);
        assert_eq!(graph.neighbors(1), &[(0, 3.5)]);
        assert!((graph.total_weight() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn self_loop_is_one_diagonal_entry_counted_once_in_total() {
        let edges = vec![
            Edge::new("a", "a", 2.0),
            Edge::new("a", "b", 1.0),
        ];
        let (graph, _) = build_graph(&edges).unwrap();

        assert_eq!(graph.neighbors(0), &[(0, 2.0), (1, 1.0)]);
        assert!((graph.total_weight() - 3.0).abs() < 1e-12);
        // Both ends of the loop land on the same node.
        assert!((graph.degree(0) - 5.0).abs() < 1e-12);
        assert!((graph.degree(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_negative_weight() {
        let edges = vec![Edge::new("a", "b", -0.5)];
        let err = build_graph(&edges).unwrap_err();

        assert_eq!(
            err,
            Error::NegativeWeight {
                from: "a".to_string(),
                to: "b".to_string(),
                weight: -0.5,
            }
        );
    }

    #[test]
    fn rejects_non_finite_weight() {
        let edges = vec![Edge::new("a", "b", f64::NAN)];
        assert!(matches!(
            build_graph(&edges),
            Err(Error::InvalidParameter { name: "weight", .. })
        ));
    }

    #[test]
    fn adjacency_is_sorted_by_neighbor() {
        let edges = vec![
            Edge::new("hub", "d", 1.0),
            Edge::new("hub", "b", 1.0),
            Edge::new("hub", "c", 1.0),
        ];
        let (graph, _) = build_graph(&edges).unwrap();

        let neighbors: Vec<usize> = graph.neighbors(0).iter().map(|&(v, _)| v).collect();
        let mut sorted = neighbors.clone();
        sorted.sort_unstable();
        assert_eq!(neighbors, sorted);
    }
}
