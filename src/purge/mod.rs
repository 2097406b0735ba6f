//! Degeneracy purging: peel minimum-degree nodes until a clique remains.
//!
//! ## The Loop
//!
//! Each iteration:
//!
//! 1. **Reduce**: minimum degree over live nodes, the number of nodes at
//!    that minimum, and the number of live nodes. Computed per block of
//!    `block_size` nodes, then combined on the host.
//! 2. **Test**: stop when `minimum + 1 >= live`. At that point every live
//!    node is adjacent to every other live node (or nothing is live).
//! 3. **Remove**: every live node at the minimum is marked inactive; each
//!    surviving node subtracts its removed neighbours from its degree.
//!
//! The graph itself is never compacted; only the degree array and the live
//! mask change between iterations.
//!
//! Unlike a full k-core decomposition, peeling continues past the point
//! where the minimum degree stops rising, so what survives is a dense
//! near-clique rather than the maximal k-core. With a clique of size `k`
//! hidden in sparse noise, the survivors are exactly that clique.
//!
//! ```rust
//! use hitgraph::csr::CsrGraph;
//! use hitgraph::purge::DegeneracyPurger;
//!
//! // triangle 0-1-2 with a tail 2-3
//! let graph = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]).unwrap();
//! let out = DegeneracyPurger::new().purge(&graph).unwrap();
//! assert_eq!(out.value, vec![0, 1, 2]);
//! ```

mod degeneracy;
mod reduce;

pub use degeneracy::{DegeneracyPurger, PurgeConfig};
pub use reduce::DegreeMinimum;
