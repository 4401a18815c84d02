//! Connectivity refinement.
//!
//! Greedy modularity moves can strand a community whose members are only
//! connected through nodes that have since moved elsewhere. Refinement
//! walks every multi-member community and splits it along the connected
//! components of its induced subgraph, so no returned community is ever
//! internally disconnected.

use std::collections::{BTreeMap, VecDeque};

use crate::graph::WeightedGraph;

/// Split every internally disconnected community.
///
/// The component containing the lowest node index keeps the original id;
/// each remaining component gets a freshly minted id strictly greater than
/// any id in use. Returns whether any community was split.
pub(super) fn split_disconnected(graph: &WeightedGraph, assignment: &mut [usize]) -> bool {
    let n = graph.node_count();

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for node in 0..n {
        members.entry(assignment[node]).or_default().push(node);
    }

    let mut next_id = assignment.iter().copied().max().map_or(0, |max| max + 1);
    let mut in_community = vec![false; n];
    let mut visited = vec![false; n];
    let mut split_any = false;

    for nodes in members.values() {
        if nodes.len() <= 1 {
            continue;
        }
        for &node in nodes {
            in_community[node] = true;
        }

        let components = components_within(graph, nodes, &in_community, &mut visited);
        if components.len() > 1 {
            split_any = true;
            for component in components.iter().skip(1) {
                for &node in component {
                    assignment[node] = next_id;
                }
                next_id += 1;
            }
        }

        for &node in nodes {
            in_community[node] = false;
            visited[node] = false;
        }
    }

    split_any
}

/// Connected components of the subgraph induced by `nodes`.
///
/// Only edges with both endpoints inside the community count. Components
/// come out in order of their lowest member index because `nodes` is
/// ascending.
fn components_within(
    graph: &WeightedGraph,
    nodes: &[usize],
    in_community: &[bool],
    visited: &mut [bool],
) -> Vec<Vec<usize>> {
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for &start in nodes {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let mut component = Vec::new();
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &(neighbor, _) in graph.neighbors(node) {
                if in_community[neighbor] && !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_internally_disconnected_community() {
        // 0-1-2 and 3-4 share a community id but have no connecting edge.
        let graph = WeightedGraph::from_weighted_edges(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (3, 4, 1.0)],
        );
        let mut assignment = vec![9, 9, 9, 9, 9];
        let split = split_disconnected(&graph, &mut assignment);

        assert!(split);
        assert_eq!(assignment[0], 9);
        assert_eq!(assignment[1], 9);
        assert_eq!(assignment[2], 9);
        assert_eq!(assignment[3], assignment[4]);
        // The minted id is strictly above anything that was in use.
        assert!(assignment[3] > 9);
    }

    #[test]
    fn leaves_connected_communities_alone() {
        let graph = WeightedGraph::from_weighted_edges(
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)],
        );
        let mut assignment = vec![0, 0, 1, 1];
        let split = split_disconnected(&graph, &mut assignment);

        assert!(!split);
        assert_eq!(assignment, vec![0, 0, 1, 1]);
    }

    #[test]
    fn zero_weight_edges_still_connect() {
        // Connectivity is about structure; a zero-weight edge is still an
        // edge of the induced subgraph.
        let graph = WeightedGraph::from_weighted_edges(3, &[(0, 1, 0.0), (1, 2, 0.0)]);
        let mut assignment = vec![0, 0, 0];
        let split = split_disconnected(&graph, &mut assignment);

        assert!(!split);
        assert_eq!(assignment, vec![0, 0, 0]);
    }

    #[test]
    fn splits_three_ways_with_distinct_fresh_ids() {
        let graph = WeightedGraph::from_weighted_edges(
            6,
            &[(0, 1, 1.0), (2, 3, 1.0), (4, 5, 1.0)],
        );
        let mut assignment = vec![2, 2, 2, 2, 2, 2];
        assert!(split_disconnected(&graph, &mut assignment));

        assert_eq!(assignment[0], 2);
        assert_eq!(assignment[1], 2);
        assert_eq!(assignment[2], assignment[3]);
        assert_eq!(assignment[4], assignment[5]);
        assert_ne!(assignment[2], assignment[4]);
        assert!(assignment[2] > 2 && assignment[4] > 2);
    }
}
