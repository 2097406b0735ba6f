//! Weighted working graph for one Louvain level.

use crate::csr::CsrGraph;
use crate::device::Device;
use crate::error::Result;

/// CSR graph with integer edge weights and per-node internal (self-loop)
/// weight.
///
/// Internal weight is stored per direction, like every adjacency entry, so
/// the weighted degree `k_i = internal_i + Σ row weights` sums to `2m`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LevelGraph {
    col_idx: Vec<u32>,
    weights: Vec<u64>,
    prefix_sums: Vec<usize>,
    internal: Vec<u64>,
    degrees: Vec<u64>,
}

impl LevelGraph {
    /// Unit weights, no internal weight.
    pub(crate) fn from_csr(graph: &CsrGraph) -> Self {
        Self {
            col_idx: graph.col_idx().to_vec(),
            weights: vec![1; graph.edge_count()],
            prefix_sums: graph.prefix_sums().to_vec(),
            internal: vec![0; graph.node_count()],
            degrees: graph.degrees().iter().map(|&d| u64::from(d)).collect(),
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.degrees.len()
    }

    /// `2m`: total weighted degree.
    pub(crate) fn total_weight(&self) -> u64 {
        self.degrees.iter().sum()
    }

    #[inline]
    pub(crate) fn degree(&self, i: usize) -> u64 {
        self.degrees[i]
    }

    #[inline]
    pub(crate) fn internal(&self, i: usize) -> u64 {
        self.internal[i]
    }

    /// `(neighbour, weight)` pairs of node `i`.
    #[inline]
    pub(crate) fn row(&self, i: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        let start = if i == 0 { 0 } else { self.prefix_sums[i - 1] };
        let end = self.prefix_sums[i];
        self.col_idx[start..end]
            .iter()
            .zip(&self.weights[start..end])
            .map(|(&j, &w)| (j as usize, w))
    }

    /// Contract each community into one node.
    ///
    /// `community[i]` must be a compact id in `0..k`. Edges are grouped by
    /// `(community(src), community(dst))` and their weights summed; edges
    /// inside a community become internal weight.
    pub(crate) fn aggregate(&self, device: &Device, community: &[usize], k: usize) -> Result<Self> {
        let members = group_members(community, k);

        let rows = device.launch_map("aggregate_communities", k, |c| {
            let mut internal = 0u64;
            let mut pairs: Vec<(u32, u64)> = Vec::new();
            for &i in &members[c] {
                internal += self.internal[i];
                for (j, w) in self.row(i) {
                    let cj = community[j];
                    if cj == c {
                        internal += w;
                    } else {
                        pairs.push((cj as u32, w));
                    }
                }
            }
            pairs.sort_unstable_by_key(|&(cj, _)| cj);
            let mut merged: Vec<(u32, u64)> = Vec::with_capacity(pairs.len());
            for (cj, w) in pairs {
                match merged.last_mut() {
                    Some(last) if last.0 == cj => last.1 += w,
                    _ => merged.push((cj, w)),
                }
            }
            (merged, internal)
        })?;

        let mut next = Self {
            col_idx: Vec::new(),
            weights: Vec::new(),
            prefix_sums: Vec::with_capacity(k),
            internal: Vec::with_capacity(k),
            degrees: Vec::with_capacity(k),
        };
        for (row, internal) in rows {
            let external: u64 = row.iter().map(|&(_, w)| w).sum();
            next.col_idx.extend(row.iter().map(|&(cj, _)| cj));
            next.weights.extend(row.iter().map(|&(_, w)| w));
            next.prefix_sums.push(next.col_idx.len());
            next.internal.push(internal);
            next.degrees.push(internal + external);
        }
        Ok(next)
    }
}

/// Node lists per community id (`ids < k`).
pub(crate) fn group_members(community: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); k];
    for (i, &c) in community.iter().enumerate() {
        members[c].push(i);
    }
    members
}

/// Renumber labels to `0..k` in ascending order of the original label.
pub(crate) fn compact_labels(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut unique = labels.to_vec();
    unique.sort_unstable();
    unique.dedup();
    let compact = labels
        .iter()
        .map(|l| unique.binary_search(l).unwrap_or_default())
        .collect();
    (compact, unique.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> CsrGraph {
        CsrGraph::from_edges(6, &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)]).unwrap()
    }

    #[test]
    fn test_aggregate_preserves_total_weight() {
        let level = LevelGraph::from_csr(&two_triangles());
        let next = level
            .aggregate(&Device::host(), &[0, 0, 0, 1, 1, 1], 2)
            .unwrap();
        assert_eq!(next.node_count(), 2);
        assert_eq!(next.total_weight(), level.total_weight());
        assert_eq!(next.internal(0), 6);
        assert_eq!(next.internal(1), 6);
        assert_eq!(next.row(0).collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(next.degree(0), 7);
    }

    #[test]
    fn test_aggregate_sums_parallel_edges() {
        // 0,1 -> community 0; 2 -> community 1; edges 0-2 and 1-2 merge.
        let graph = CsrGraph::from_edges(3, &[(0, 2), (1, 2)]).unwrap();
        let level = LevelGraph::from_csr(&graph);
        let next = level.aggregate(&Device::host(), &[0, 0, 1], 2).unwrap();
        assert_eq!(next.row(0).collect::<Vec<_>>(), vec![(1, 2)]);
        assert_eq!(next.row(1).collect::<Vec<_>>(), vec![(0, 2)]);
        assert_eq!(next.internal(0), 0);
    }

    #[test]
    fn test_compact_labels() {
        let (compact, k) = compact_labels(&[7, 3, 7, 9]);
        assert_eq!(compact, vec![1, 0, 1, 2]);
        assert_eq!(k, 3);
    }
}
