//! Graph aggregation (coarsening).
//!
//! Each community collapses into one coarse node. Weight between two
//! communities merges onto a single coarse edge; weight inside a community
//! becomes a self-loop on its coarse node. Self-loops are what keep
//! modularity identical across levels: total weight, internal weight, and
//! community volumes all survive the coarsening unchanged.

use std::collections::{BTreeMap, HashMap};

use crate::graph::WeightedGraph;

/// One level of coarsening.
pub(super) struct Aggregated {
    /// The coarse graph; one node per distinct community id.
    pub(super) graph: WeightedGraph,
    /// For each coarse node, the community id it represents.
    pub(super) represents: Vec<usize>,
    /// Community id -> coarse node index.
    pub(super) relabel: HashMap<usize, usize>,
}

/// Collapse `assignment`'s communities into coarse nodes.
///
/// Distinct community ids are relabeled to a dense range in ascending id
/// order, so the coarse node layout is independent of traversal order.
pub(super) fn aggregate(graph: &WeightedGraph, assignment: &[usize]) -> Aggregated {
    let mut represents: Vec<usize> = assignment.to_vec();
    represents.sort_unstable();
    represents.dedup();

    let relabel: HashMap<usize, usize> = represents
        .iter()
        .enumerate()
        .map(|(coarse, &id)| (id, coarse))
        .collect();

    let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for &(u, v, w) in graph.edges() {
        let cu = relabel[&assignment[u]];
        let cv = relabel[&assignment[v]];
        let key = if cu <= cv { (cu, cv) } else { (cv, cu) };
        *merged.entry(key).or_insert(0.0) += w;
    }

    let coarse_edges: Vec<(usize, usize, f64)> = merged
        .into_iter()
        .map(|((u, v), w)| (u, v, w))
        .collect();

    Aggregated {
        graph: WeightedGraph::from_weighted_edges(represents.len(), &coarse_edges),
        represents,
        relabel,
    }
}
