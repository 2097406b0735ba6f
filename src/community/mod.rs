//! Community detection on correlation graphs.
//!
//! Given a graph, find natural groupings where nodes within groups are
//! densely connected, and connections between groups are sparse.
//!
//! ## The Modularity Objective
//!
//! Louvain optimizes **modularity** Q, which compares the actual number of
//! edges within communities to the expected number in a random graph with
//! the same degree sequence:
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! Where:
//! - m = total edge weight (sum of all edges)
//! - A_ij = edge weight between i and j
//! - k_i = degree of node i
//! - δ(c_i, c_j) = 1 if i and j are in same community
//!
//! Grouped by community this is `Σ_c [in_c/2m − (Σ_c/2m)²]`, where `in_c`
//! counts edge endpoints inside `c` and `Σ_c` is the summed degree of its
//! members. Each term depends on one community only, which is how it is
//! evaluated here.
//!
//! **Intuition**: For each pair in the same community, we add (actual edges) -
//! (expected edges). A good partition has Q > 0, meaning more internal edges
//! than expected by chance.
//!
//! ## Usage
//!
//! ```rust
//! use hitgraph::community::{CommunityDetection, Louvain};
//! use hitgraph::csr::CsrGraph;
//!
//! // two triangles joined by one edge
//! let graph = CsrGraph::from_edges(
//!     6,
//!     &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)],
//! )
//! .unwrap();
//!
//! let out = Louvain::new().detect(&graph).unwrap();
//! // communities[i] = community ID for node i
//! assert_eq!(out.value, vec![0, 0, 0, 1, 1, 1]);
//! ```
//!
//! ## References
//!
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod level;
mod louvain;
mod modularity;
mod traits;

pub use louvain::{Louvain, LouvainConfig};
pub use modularity::modularity;
pub use traits::CommunityDetection;
