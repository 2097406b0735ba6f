//! Modularity of a partition, evaluated as per-community partial sums.

use super::level::{compact_labels, group_members, LevelGraph};
use crate::csr::CsrGraph;
use crate::device::Device;
use crate::error::{Error, Result};

/// Per-community statistics of one partition of a [`LevelGraph`].
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    /// `Σ_c`: total weighted degree of each community.
    pub(crate) totals: Vec<u64>,
    /// Modularity of the whole partition.
    pub(crate) modularity: f64,
}

/// Evaluate a partition whose community ids all lie in `0..level.node_count()`.
pub(crate) fn evaluate(device: &Device, level: &LevelGraph, community: &[usize]) -> Result<Evaluation> {
    let n = level.node_count();
    let two_m = level.total_weight() as f64;
    let members = group_members(community, n);

    let totals = device.launch_map("community_degrees", n, |c| {
        members[c].iter().map(|&i| level.degree(i)).sum::<u64>()
    })?;

    let node_internal = device.launch_map("community_internal", n, |i| {
        let own = community[i];
        level.internal(i)
            + level
                .row(i)
                .filter(|&(j, _)| community[j] == own)
                .map(|(_, w)| w)
                .sum::<u64>()
    })?;

    let partial = device.launch_map("partial_modularity", n, |c| {
        if members[c].is_empty() || two_m == 0.0 {
            return 0.0;
        }
        let inside: u64 = members[c].iter().map(|&i| node_internal[i]).sum();
        let share = totals[c] as f64 / two_m;
        inside as f64 / two_m - share * share
    })?;

    Ok(Evaluation {
        totals,
        modularity: partial.iter().sum(),
    })
}

/// Newman modularity of `assignment` on an unweighted graph.
///
/// Community labels may be arbitrary; they are only compared for equality.
/// A graph without edges has modularity 0.
///
/// ```rust
/// use hitgraph::community::modularity;
/// use hitgraph::csr::CsrGraph;
///
/// let graph = CsrGraph::from_edges(2, &[(0, 1)]).unwrap();
/// assert_eq!(modularity(&graph, &[0, 0]).unwrap(), 0.0);
/// assert_eq!(modularity(&graph, &[0, 1]).unwrap(), -0.5);
/// ```
pub fn modularity(graph: &CsrGraph, assignment: &[usize]) -> Result<f64> {
    if assignment.len() != graph.node_count() {
        return Err(Error::shape(
            format!("{} community labels", graph.node_count()),
            assignment.len(),
        ));
    }
    let (compact, _) = compact_labels(assignment);
    let level = LevelGraph::from_csr(graph);
    Ok(evaluate(&Device::host(), &level, &compact)?.modularity)
}
