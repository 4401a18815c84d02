//! # enclave
//!
//! Hierarchical community detection for weighted entity-relationship
//! graphs: campaign NPCs, locations, factions, and the inferred
//! relationships between them, partitioned into nested, well-connected
//! groups for lore summarization and retrieval.
//!
//! ## The Modularity Objective
//!
//! Detection optimizes **modularity** Q, which compares the edge weight
//! inside communities to the weight expected in a random graph with the
//! same degree sequence:
//!
//! ```text
//! Q = Σ_c [ internal(c)/m − γ·(volume(c)/2m)² ]
//! ```
//!
//! A good partition has Q > 0: more internal weight than chance would
//! give. The resolution parameter γ controls granularity: γ > 1 favors
//! smaller communities, γ < 1 larger ones.
//!
//! ## The Algorithm
//!
//! Greedy modularity optimization alone (Louvain-style) can return
//! communities that are internally disconnected. The engine here follows
//! Traag et al. and inserts a refinement pass between optimization and
//! aggregation, so every returned community is guaranteed to be connected:
//!
//! 1. **Local moving**: greedily move nodes to neighboring communities.
//! 2. **Refinement**: split communities whose induced subgraph is
//!    disconnected.
//! 3. **Aggregation**: collapse communities into coarse nodes; repeat
//!    until modularity stops improving.
//!
//! ## Usage
//!
//! ```rust
//! use enclave::{detect_communities, Edge};
//!
//! let edges = vec![
//!     Edge::new("thorin", "balin", 1.0),
//!     Edge::new("balin", "dwalin", 1.0),
//!     Edge::new("thorin", "dwalin", 1.0),
//! ];
//!
//! let members = detect_communities(&edges).unwrap();
//! assert_eq!(members.len(), 3);
//! assert!(members.iter().all(|m| m.community_id == members[0].community_id));
//! ```
//!
//! Pass a seed for reproducible results (tests should always do this):
//!
//! ```rust
//! use enclave::{Edge, Leiden};
//!
//! let edges = vec![Edge::new("rivendell", "elrond", 2.0)];
//! let a = Leiden::new().with_seed(42).detect(&edges).unwrap();
//! let b = Leiden::new().with_seed(42).detect(&edges).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! ## References
//!
//! - Traag, Waltman, van Eck (2019). "From Louvain to Leiden: guaranteeing
//!   well-connected communities." Scientific Reports 9, 5233.
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

/// Error types used across `enclave`.
pub mod error;

mod graph;
mod leiden;
mod modularity;

pub use error::{Error, Result};
pub use graph::Edge;
pub use leiden::{detect_communities, Leiden, Membership};
