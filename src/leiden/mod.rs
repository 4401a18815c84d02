//! Hierarchical community detection with a connectivity guarantee.
//!
//! Plain greedy modularity optimization (Louvain-style) can return
//! communities whose members have no internal path between them. The engine
//! here closes that hole with a refinement pass, following the approach of
//! Traag et al.:
//!
//! 1. **Local moving**: greedily move nodes to the neighboring community
//!    with the best modularity gain, visiting nodes in seeded-random order.
//! 2. **Refinement**: split every community whose induced subgraph is
//!    disconnected.
//! 3. **Aggregation**: collapse each community into one coarse node and
//!    repeat on the smaller graph, until a level stops improving modularity
//!    by at least the configured threshold.
//!
//! The mapping from every original node to its current community is
//! composed through each level, so the result is always expressed in the
//! caller's own identifiers no matter how many levels ran.
//!
//! ## References
//!
//! Traag, Waltman, van Eck (2019). "From Louvain to Leiden: guaranteeing
//! well-connected communities." Scientific Reports 9, 5233.

mod aggregate;
mod local_move;
mod refine;

use std::collections::{HashMap, HashSet};

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rand::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{build_graph, Edge, WeightedGraph};
use crate::modularity::modularity;

/// Hard cap on aggregation levels. Real graphs converge in a handful of
/// levels; the cap forces termination for inputs that never stop clearing
/// the improvement threshold.
const MAX_LEVELS: usize = 100;

/// Community membership of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Membership {
    /// The entity identifier, exactly as it appeared in the input edges.
    pub node_id: String,
    /// The community the entity ended up in. Ids are dense, starting at 0.
    pub community_id: usize,
}

/// Hierarchical community detector.
///
/// Results are non-deterministic unless a seed is supplied; tests should
/// always set one.
///
/// ```rust
/// use enclave::{Edge, Leiden};
///
/// let edges = vec![
///     Edge::new("arwen", "elrond", 1.0),
///     Edge::new("elrond", "glorfindel", 1.0),
///     Edge::new("arwen", "glorfindel", 1.0),
///     Edge::new("denethor", "boromir", 1.0),
///     Edge::new("boromir", "faramir", 1.0),
///     Edge::new("denethor", "faramir", 1.0),
/// ];
///
/// let members = Leiden::new().with_seed(42).detect(&edges).unwrap();
/// let of = |id: &str| {
///     members
///         .iter()
///         .find(|m| m.node_id == id)
///         .map(|m| m.community_id)
///         .unwrap()
/// };
///
/// assert_eq!(of("arwen"), of("glorfindel"));
/// assert_eq!(of("denethor"), of("faramir"));
/// assert_ne!(of("arwen"), of("denethor"));
/// ```
#[derive(Debug, Clone)]
pub struct Leiden {
    /// Resolution parameter (gamma). Higher = smaller communities.
    resolution: f64,
    /// Maximum local-move passes per level.
    max_iterations: usize,
    /// Minimum modularity improvement to keep aggregating.
    min_improvement: f64,
    /// Random seed for the node visiting order.
    seed: Option<u64>,
}

impl Leiden {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 10,
            min_improvement: 1e-4,
            seed: None,
        }
    }

    /// Set the resolution parameter.
    ///
    /// Higher values produce smaller communities. Must be finite and
    /// positive.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the maximum local-move passes per level.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the minimum modularity improvement to keep aggregating.
    pub fn with_min_improvement(mut self, min_improvement: f64) -> Self {
        self.min_improvement = min_improvement;
        self
    }

    /// Set the random seed, making results reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Detect communities in a list of weighted relationship edges.
    ///
    /// Every entity appearing in any edge appears exactly once in the
    /// result. An empty edge list yields an empty result; a negative edge
    /// weight is a validation error.
    pub fn detect(&self, edges: &[Edge]) -> Result<Vec<Membership>> {
        self.validate()?;
        if edges.is_empty() {
            return Ok(Vec::new());
        }

        let (graph, ids) = build_graph(edges)?;
        let assignment = self.partition(graph);

        Ok(ids
            .into_iter()
            .zip(assignment)
            .map(|(node_id, community_id)| Membership {
                node_id,
                community_id,
            })
            .collect())
    }

    /// Detect communities in a petgraph undirected graph.
    ///
    /// Returns the community id for each node, indexed by
    /// `NodeIndex::index()`. Nodes without edges are allowed and end up in
    /// singleton communities.
    pub fn detect_graph<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>
    where
        E: Copy + Into<f64>,
    {
        self.validate()?;
        let n = graph.node_count();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut raw: Vec<(usize, usize, f64)> = Vec::with_capacity(graph.edge_count());
        for edge in graph.edge_references() {
            let u = edge.source().index();
            let v = edge.target().index();
            let w: f64 = (*edge.weight()).into();
            if w < 0.0 {
                return Err(Error::NegativeWeight {
                    from: u.to_string(),
                    to: v.to_string(),
                    weight: w,
                });
            }
            if !w.is_finite() {
                return Err(Error::InvalidParameter {
                    name: "weight",
                    message: "edge weight must be finite",
                });
            }
            raw.push((u, v, w));
        }

        Ok(self.partition(WeightedGraph::from_weighted_edges(n, &raw)))
    }

    fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be finite and positive",
            });
        }
        if !self.min_improvement.is_finite() {
            return Err(Error::InvalidParameter {
                name: "min_improvement",
                message: "must be finite",
            });
        }
        Ok(())
    }

    /// Multi-level driver: optimize, refine, evaluate, aggregate.
    ///
    /// `membership[i]` tracks original node `i` through every level: it
    /// holds a coarse node index going into a level and is rewritten by two
    /// lookups per level (the level's assignment, then the aggregation
    /// relabeling). It is never reconstructed by walking coarse graphs.
    fn partition(&self, mut graph: WeightedGraph) -> Vec<usize> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        };

        let mut membership: Vec<usize> = (0..graph.node_count()).collect();

        for level in 0..MAX_LEVELS {
            let n = graph.node_count();
            let identity: Vec<usize> = (0..n).collect();
            let before = modularity(&graph, &identity, self.resolution);

            let mut local = identity;
            let _ = local_move::local_moving(
                &graph,
                &mut local,
                self.resolution,
                self.max_iterations,
                rng.as_mut(),
            );
            let _ = refine::split_disconnected(&graph, &mut local);

            let after = modularity(&graph, &local, self.resolution);

            // Fold this level in before deciding whether to stop, so the
            // final mapping always reflects the last moves and splits.
            for slot in membership.iter_mut() {
                *slot = local[*slot];
            }

            debug!(
                level,
                nodes = n,
                communities = local.iter().collect::<HashSet<_>>().len(),
                modularity = after,
                "level complete"
            );

            if after - before < self.min_improvement {
                break;
            }

            let agg = aggregate::aggregate(&graph, &local);
            if agg.graph.node_count() == n {
                // No coarsening progress; another level would redo the
                // same work on the same graph.
                break;
            }
            for slot in membership.iter_mut() {
                *slot = agg.relabel[&*slot];
            }
            graph = agg.graph;
        }

        renumber(&mut membership);
        membership
    }
}

impl Default for Leiden {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect communities with default options.
///
/// Shorthand for [`Leiden::new().detect(edges)`](Leiden::detect). Without a
/// seed the result is non-deterministic across runs.
pub fn detect_communities(edges: &[Edge]) -> Result<Vec<Membership>> {
    Leiden::new().detect(edges)
}

/// Renumber arbitrary ids to `0..k` in first-seen order.
fn renumber(assignment: &mut [usize]) {
    let mut map: HashMap<usize, usize> = HashMap::new();
    let mut next = 0usize;
    for slot in assignment.iter_mut() {
        let id = *map.entry(*slot).or_insert_with(|| {
            let current = next;
            next += 1;
            current
        });
        *slot = id;
    }
}
