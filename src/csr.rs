//! Compressed sparse row adjacency for correlation graphs.
//!
//! ```text
//! degrees      [2, 1, 1]
//! prefix_sums  [2, 3, 4]        inclusive running total
//! col_idx      [1, 2, 0, 0]     row i = col_idx[prefix_sums[i-1]..prefix_sums[i]]
//! ```
//!
//! Each undirected edge is stored once per endpoint, so `edge_count()` is
//! twice the number of undirected edges and always equals `sum(degrees)`.

use crate::error::{Error, Result};
use ndarray::Array2;
use petgraph::graph::{NodeIndex, UnGraph};
use std::ops::Range;

/// Immutable CSR correlation graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrGraph {
    col_idx: Vec<u32>,
    prefix_sums: Vec<usize>,
    degrees: Vec<u32>,
}

impl CsrGraph {
    /// Graph without nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a graph from raw CSR arrays, checking that they agree.
    ///
    /// Rows must be strictly ascending and must not contain their own node.
    pub fn from_parts(col_idx: Vec<u32>, prefix_sums: Vec<usize>, degrees: Vec<u32>) -> Result<Self> {
        let n = degrees.len();
        if prefix_sums.len() != n {
            return Err(Error::shape(
                format!("{n} prefix sums (one per node)"),
                format!("{} prefix sums", prefix_sums.len()),
            ));
        }
        let mut running = 0usize;
        for (i, (&d, &p)) in degrees.iter().zip(&prefix_sums).enumerate() {
            running += d as usize;
            if p != running {
                return Err(Error::InvalidGraph(format!(
                    "prefix_sums[{i}] = {p}, but degrees sum to {running}"
                )));
            }
        }
        if running != col_idx.len() {
            return Err(Error::InvalidGraph(format!(
                "degrees sum to {running}, col_idx has {} entries",
                col_idx.len()
            )));
        }
        if let Some(&bad) = col_idx.iter().find(|&&c| c as usize >= n) {
            return Err(Error::InvalidGraph(format!(
                "column index {bad} out of range for {n} nodes"
            )));
        }
        let graph = Self {
            col_idx,
            prefix_sums,
            degrees,
        };
        for i in 0..n {
            let row = graph.row(i);
            if row.contains(&(i as u32)) {
                return Err(Error::InvalidGraph(format!("row {i} contains a self-loop")));
            }
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::InvalidGraph(format!(
                    "row {i} is not strictly ascending (unsorted or duplicate entries)"
                )));
            }
        }
        Ok(graph)
    }

    /// Assemble without validation. Callers guarantee consistency.
    pub(crate) fn from_parts_unchecked(
        col_idx: Vec<u32>,
        prefix_sums: Vec<usize>,
        degrees: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(prefix_sums.len(), degrees.len());
        debug_assert_eq!(prefix_sums.last().copied().unwrap_or(0), col_idx.len());
        Self {
            col_idx,
            prefix_sums,
            degrees,
        }
    }

    /// Build from neighbour lists. Lists are sorted and deduplicated; self
    /// references are dropped.
    pub fn from_adjacency(mut adjacency: Vec<Vec<u32>>) -> Result<Self> {
        let n = adjacency.len();
        let mut col_idx = Vec::new();
        let mut prefix_sums = Vec::with_capacity(n);
        let mut degrees = Vec::with_capacity(n);
        for (i, row) in adjacency.iter_mut().enumerate() {
            row.sort_unstable();
            row.dedup();
            row.retain(|&j| j as usize != i);
            degrees.push(row.len() as u32);
            col_idx.extend_from_slice(row);
            prefix_sums.push(col_idx.len());
        }
        Self::from_parts(col_idx, prefix_sums, degrees)
    }

    /// Undirected graph on `n` nodes from an edge list.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut adjacency = vec![Vec::new(); n];
        for &(i, j) in edges {
            if i >= n || j >= n {
                return Err(Error::InvalidGraph(format!(
                    "edge ({i}, {j}) out of range for {n} nodes"
                )));
            }
            adjacency[i].push(j as u32);
            adjacency[j].push(i as u32);
        }
        Self::from_adjacency(adjacency)
    }

    /// Build from a square dense adjacency matrix; nonzero entries are edges.
    pub fn from_dense(matrix: &Array2<u8>) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(Error::shape(
                "square adjacency matrix",
                format!("{rows} x {cols}"),
            ));
        }
        let adjacency = matrix
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &v)| v != 0)
                    .map(|(j, _)| j as u32)
                    .collect()
            })
            .collect();
        Self::from_adjacency(adjacency)
    }

    /// Convert a petgraph graph. Parallel edges collapse and self-loops are dropped.
    pub fn from_ungraph<N, E>(graph: &UnGraph<N, E>) -> Result<Self> {
        let adjacency = graph
            .node_indices()
            .map(|node| graph.neighbors(node).map(|nb| nb.index() as u32).collect())
            .collect();
        Self::from_adjacency(adjacency)
    }

    /// Convert to a petgraph graph with one edge per undirected pair.
    pub fn to_ungraph(&self) -> UnGraph<(), ()> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count() / 2);
        for _ in 0..self.node_count() {
            let _ = graph.add_node(());
        }
        for i in 0..self.node_count() {
            for &j in self.row(i) {
                if i < j as usize {
                    let _ = graph.add_edge(NodeIndex::new(i), NodeIndex::new(j as usize), ());
                }
            }
        }
        graph
    }

    /// Dense `n x n` 0/1 matrix.
    pub fn to_dense(&self) -> Array2<u8> {
        let n = self.node_count();
        let mut out = Array2::zeros((n, n));
        for i in 0..n {
            for &j in self.row(i) {
                out[[i, j as usize]] = 1;
            }
        }
        out
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.degrees.len()
    }

    /// Total number of stored adjacency entries (`sum(degrees)`).
    pub fn edge_count(&self) -> usize {
        self.col_idx.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Degree of node `i`.
    #[inline]
    pub fn degree(&self, i: usize) -> u32 {
        self.degrees[i]
    }

    /// Offsets of row `i` within `col_idx`.
    #[inline]
    pub fn row_range(&self, i: usize) -> Range<usize> {
        let start = if i == 0 { 0 } else { self.prefix_sums[i - 1] };
        start..self.prefix_sums[i]
    }

    /// Neighbours of node `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[u32] {
        &self.col_idx[self.row_range(i)]
    }

    /// Flat neighbour array.
    pub fn col_idx(&self) -> &[u32] {
        &self.col_idx
    }

    /// Inclusive prefix sums of the degrees.
    pub fn prefix_sums(&self) -> &[usize] {
        &self.prefix_sums
    }

    /// Per-node degrees.
    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    /// Split into `(col_idx, prefix_sums, degrees)`.
    pub fn into_parts(self) -> (Vec<u32>, Vec<usize>, Vec<u32>) {
        (self.col_idx, self.prefix_sums, self.degrees)
    }

    /// Whether every edge `i -> j` has its reverse `j -> i`.
    pub fn is_symmetric(&self) -> bool {
        (0..self.node_count()).all(|i| {
            self.row(i)
                .iter()
                .all(|&j| self.row(j as usize).contains(&(i as u32)))
        })
    }

    /// Subgraph induced by `nodes`; node `k` of the result is `nodes[k]`.
    pub fn induced_subgraph(&self, nodes: &[usize]) -> Result<Self> {
        let n = self.node_count();
        let mut position = vec![u32::MAX; n];
        for (k, &node) in nodes.iter().enumerate() {
            if node >= n {
                return Err(Error::InvalidGraph(format!(
                    "node {node} out of range for {n} nodes"
                )));
            }
            position[node] = k as u32;
        }
        let adjacency = nodes
            .iter()
            .map(|&node| {
                self.row(node)
                    .iter()
                    .map(|&j| position[j as usize])
                    .filter(|&p| p != u32::MAX)
                    .collect()
            })
            .collect();
        Self::from_adjacency(adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn path3() -> CsrGraph {
        CsrGraph::from_edges(3, &[(0, 1), (0, 2)]).unwrap()
    }

    #[test]
    fn test_layout_matches_module_docs() {
        let g = path3();
        assert_eq!(g.degrees(), &[2, 1, 1]);
        assert_eq!(g.prefix_sums(), &[2, 3, 4]);
        assert_eq!(g.col_idx(), &[1, 2, 0, 0]);
        assert_eq!(g.row(0), &[1, 2]);
        assert_eq!(g.row(2), &[0]);
        assert_eq!(g.edge_count(), 4);
        assert!(g.is_symmetric());
    }

    #[test]
    fn test_from_parts_rejects_bad_lengths() {
        let err = CsrGraph::from_parts(vec![1, 0], vec![1], vec![1, 1]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));

        let err = CsrGraph::from_parts(vec![1, 0], vec![1, 3], vec![1, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));

        let err = CsrGraph::from_parts(vec![5, 0], vec![1, 2], vec![1, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
    }

    #[test]
    fn test_from_parts_rejects_self_loops_and_duplicates() {
        // row 0 lists itself
        let err = CsrGraph::from_parts(vec![0, 1, 0], vec![2, 3], vec![2, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(ref m) if m.contains("self-loop")));

        // row 0 lists node 1 twice
        let err = CsrGraph::from_parts(vec![1, 1, 0], vec![2, 3], vec![2, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(ref m) if m.contains("ascending")));

        // row 0 out of order
        let err = CsrGraph::from_parts(vec![2, 1, 0, 0], vec![2, 3, 4], vec![2, 1, 1]).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));

        let ok = CsrGraph::from_parts(vec![1, 2, 0, 0], vec![2, 3, 4], vec![2, 1, 1]).unwrap();
        assert_eq!(ok.row(0), &[1, 2]);
    }

    #[test]
    fn test_dense_round_trip() {
        let m = array![[0u8, 1, 0], [1, 0, 1], [0, 1, 0]];
        let g = CsrGraph::from_dense(&m).unwrap();
        assert_eq!(g.to_dense(), m);
    }

    #[test]
    fn test_asymmetric_detected() {
        let m = array![[0u8, 1], [0, 0]];
        assert!(!CsrGraph::from_dense(&m).unwrap().is_symmetric());
    }

    #[test]
    fn test_petgraph_round_trip() {
        let g = path3();
        let ug = g.to_ungraph();
        assert_eq!(ug.node_count(), 3);
        assert_eq!(ug.edge_count(), 2);
        assert_eq!(CsrGraph::from_ungraph(&ug).unwrap(), g);
    }

    #[test]
    fn test_induced_subgraph() {
        let g = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (1, 3)]).unwrap();
        let sub = g.induced_subgraph(&[1, 2, 3]).unwrap();
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.row(0), &[1, 2]);
        assert_eq!(sub.edge_count(), 6);
        assert!(g.induced_subgraph(&[9]).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let g = CsrGraph::empty();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_symmetric());
    }
}
