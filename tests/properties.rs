//! Randomized invariants over arbitrary small lore graphs.

use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;

use enclave::{Edge, Leiden, Membership};

fn arb_edge() -> impl Strategy<Value = Edge> {
    (0..12usize, 0..12usize, 0.0f64..5.0)
        .prop_map(|(a, b, w)| Edge::new(format!("npc-{a}"), format!("npc-{b}"), w))
}

fn arb_edges() -> impl Strategy<Value = Vec<Edge>> {
    proptest::collection::vec(arb_edge(), 0..40)
}

/// Nodes of one community must be mutually reachable through edges whose
/// endpoints both lie in that community.
fn assert_communities_connected(edges: &[Edge], members: &[Membership]) {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for e in edges {
        adjacency.entry(e.from.as_str()).or_default().push(e.to.as_str());
        adjacency.entry(e.to.as_str()).or_default().push(e.from.as_str());
    }

    let mut by_community: HashMap<usize, Vec<&str>> = HashMap::new();
    for m in members {
        by_community
            .entry(m.community_id)
            .or_default()
            .push(m.node_id.as_str());
    }

    for (id, nodes) in by_community {
        let inside: HashSet<&str> = nodes.iter().copied().collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue = VecDeque::from([nodes[0]]);
        let _ = seen.insert(nodes[0]);
        while let Some(node) = queue.pop_front() {
            for &next in adjacency.get(node).into_iter().flatten() {
                if inside.contains(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        assert_eq!(
            seen.len(),
            nodes.len(),
            "community {id} is internally disconnected"
        );
    }
}

proptest! {
    #[test]
    fn every_endpoint_appears_exactly_once(edges in arb_edges()) {
        let members = Leiden::new().with_seed(7).detect(&edges).unwrap();

        let expected: HashSet<&str> = edges
            .iter()
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .collect();
        let produced: Vec<&str> = members.iter().map(|m| m.node_id.as_str()).collect();
        let unique: HashSet<&str> = produced.iter().copied().collect();

        prop_assert_eq!(produced.len(), unique.len());
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn seeded_runs_are_byte_identical(edges in arb_edges(), seed in any::<u64>()) {
        let detector = Leiden::new().with_seed(seed);
        let first = detector.detect(&edges).unwrap();
        let second = detector.detect(&edges).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn no_returned_community_is_disconnected(edges in arb_edges()) {
        let members = Leiden::new().with_seed(13).detect(&edges).unwrap();
        assert_communities_connected(&edges, &members);
    }

    #[test]
    fn community_ids_are_dense(edges in arb_edges()) {
        let members = Leiden::new().with_seed(19).detect(&edges).unwrap();
        let ids: HashSet<usize> = members.iter().map(|m| m.community_id).collect();
        for id in 0..ids.len() {
            prop_assert!(ids.contains(&id));
        }
    }
}
