//! Community detection traits.

use crate::csr::CsrGraph;
use crate::error::{Outcome, Result};

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph.
    ///
    /// Returns a mapping from node index to compact community ID, plus how
    /// many iterations it took and whether the algorithm reached its own
    /// stopping criterion.
    fn detect(&self, graph: &CsrGraph) -> Result<Outcome<Vec<usize>>>;

    /// Minimum modularity gain the algorithm treats as progress.
    fn threshold(&self) -> f64 {
        0.0
    }
}
