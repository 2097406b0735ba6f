use super::reduce::{minimum_degree, DegreeMinimum};
use crate::csr::CsrGraph;
use crate::device::Device;
use crate::error::{Error, Outcome, Result};
use serde::{Deserialize, Serialize};

/// Settings for [`DegeneracyPurger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Nodes per partial reduction block.
    pub block_size: usize,
    /// Iteration budget; `None` means one more than the node count.
    pub max_iter: Option<usize>,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            block_size: 128,
            max_iter: None,
        }
    }
}

/// Minimum-degree peeling that extracts a near-clique.
#[derive(Debug, Clone, Default)]
pub struct DegeneracyPurger {
    config: PurgeConfig,
    device: Device,
}

/// Per-iteration state: effective degrees and the live mask.
struct PeelState {
    degrees: Vec<u32>,
    live: Vec<bool>,
}

impl PeelState {
    fn survivors(&self, shift: usize) -> Vec<usize> {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(i, _)| i + shift)
            .collect()
    }
}

impl DegeneracyPurger {
    /// Purger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Purger from a config.
    pub fn from_config(config: PurgeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the reduction block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = Some(max_iter);
        self
    }

    /// Set the launch device.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Surviving node indices, ascending.
    pub fn purge(&self, graph: &CsrGraph) -> Result<Outcome<Vec<usize>>> {
        self.purge_shifted(graph, 0)
    }

    /// Surviving node indices with `shift` added to each.
    ///
    /// The shift maps indices inside an analysis slice back to a larger
    /// global index space.
    pub fn purge_shifted(&self, graph: &CsrGraph, shift: usize) -> Result<Outcome<Vec<usize>>> {
        if self.config.block_size == 0 {
            return Err(Error::InvalidParameter {
                name: "block_size",
                message: "must be positive",
            });
        }
        let n = graph.node_count();
        let max_iter = self.config.max_iter.unwrap_or(n + 1);

        let mut state = PeelState {
            degrees: graph.degrees().to_vec(),
            live: vec![true; n],
        };
        let mut iterations = 0;

        loop {
            let current = minimum_degree(&self.device, &state.degrees, &state.live, self.config.block_size)?;
            tracing::trace!(
                iteration = iterations,
                minimum = current.minimum,
                at_minimum = current.at_minimum,
                live = current.live,
                "purge step"
            );

            if current.is_fixpoint() {
                tracing::debug!(
                    nodes = n,
                    survivors = current.live,
                    minimum = current.minimum,
                    iterations,
                    "purge converged"
                );
                return Ok(Outcome::converged(state.survivors(shift), iterations));
            }
            if iterations >= max_iter {
                tracing::warn!(iterations, live = current.live, "purge iteration budget exhausted");
                return Ok(Outcome::exhausted(state.survivors(shift), iterations));
            }

            state = self.remove_nodes(graph, state, current)?;
            iterations += 1;
        }
    }

    /// Drop every live node at the current minimum.
    ///
    /// Each remaining node subtracts the number of its neighbours being
    /// dropped, so every element writes only its own entry.
    fn remove_nodes(&self, graph: &CsrGraph, state: PeelState, current: DegreeMinimum) -> Result<PeelState> {
        let PeelState { degrees, live } = state;
        let min = current.minimum;
        let doomed = |j: usize| live[j] && degrees[j] == min;

        let next = self.device.launch_map("remove_nodes", graph.node_count(), |i| {
            if !live[i] || degrees[i] == min {
                return (0, false);
            }
            let removed = graph.row(i).iter().filter(|&&j| doomed(j as usize)).count() as u32;
            (degrees[i].saturating_sub(removed), true)
        })?;

        let (degrees, live) = next.into_iter().unzip();
        Ok(PeelState { degrees, live })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{insert_clique, random_correlations};
    use proptest::prelude::*;

    fn complete(n: usize) -> CsrGraph {
        let edges: Vec<_> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        CsrGraph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn test_finds_inserted_clique() {
        let (n, window, size) = (300, 150, 12);
        let mut dense = random_correlations(n, window, 0.02, 1234);
        let clique = insert_clique(&mut dense, window, size, 99).unwrap();
        let graph = CsrGraph::from_dense(&dense).unwrap();

        for device in [Device::host(), Device::with_threads(4).unwrap()] {
            let out = DegeneracyPurger::new().with_device(device).purge(&graph).unwrap();
            assert!(out.converged);
            assert_eq!(out.value, clique);
        }
    }

    #[test]
    fn test_idempotent_on_survivors() {
        let mut dense = random_correlations(200, 60, 0.05, 7);
        let _ = insert_clique(&mut dense, 60, 9, 7).unwrap();
        let graph = CsrGraph::from_dense(&dense).unwrap();
        let purger = DegeneracyPurger::new();

        let first = purger.purge(&graph).unwrap().into_converged().unwrap();
        let sub = graph.induced_subgraph(&first).unwrap();
        let second = purger.purge(&sub).unwrap().into_converged().unwrap();
        let mapped: Vec<usize> = second.iter().map(|&k| first[k]).collect();
        assert_eq!(mapped, first);
    }

    #[test]
    fn test_shift_applied() {
        let graph = complete(4);
        let out = DegeneracyPurger::new().purge_shifted(&graph, 1000).unwrap();
        assert_eq!(out.value, vec![1000, 1001, 1002, 1003]);
        assert_eq!(out.iterations, 0);
    }

    #[test]
    fn test_path_keeps_center() {
        let graph = CsrGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let out = DegeneracyPurger::new().purge(&graph).unwrap();
        assert_eq!(out.value, vec![1]);
    }

    #[test]
    fn test_cycle_purges_to_nothing() {
        let graph = CsrGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let out = DegeneracyPurger::new().purge(&graph).unwrap();
        assert!(out.converged);
        assert!(out.value.is_empty());
    }

    #[test]
    fn test_single_node() {
        let graph = CsrGraph::from_edges(1, &[]).unwrap();
        let out = DegeneracyPurger::new().purge(&graph).unwrap();
        assert!(out.converged);
        assert!(out.value.len() <= 1);
    }

    #[test]
    fn test_empty_graph() {
        let out = DegeneracyPurger::new().purge(&CsrGraph::empty()).unwrap();
        assert!(out.converged);
        assert!(out.value.is_empty());
    }

    #[test]
    fn test_budget_exhaustion_reports_best_state() {
        let graph = CsrGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let out = DegeneracyPurger::new().with_max_iter(0).purge(&graph).unwrap();
        assert!(!out.converged);
        assert_eq!(out.value, vec![0, 1, 2, 3]);
        assert!(matches!(
            out.into_converged(),
            Err(Error::ConvergenceFailure { iterations: 0 })
        ));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let err = DegeneracyPurger::new()
            .with_block_size(0)
            .purge(&complete(3))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]
        #[test]
        fn survivors_form_a_clique_and_ignore_block_size(
            n in 1usize..80,
            p in 0.0f64..0.6,
            seed in 0u64..500,
            block_size in 1usize..40,
        ) {
            let graph = CsrGraph::from_dense(&random_correlations(n, 20, p, seed)).unwrap();
            let reference = DegeneracyPurger::new().purge(&graph).unwrap();
            let blocked = DegeneracyPurger::new().with_block_size(block_size).purge(&graph).unwrap();
            prop_assert!(reference.converged);
            prop_assert_eq!(&reference.value, &blocked.value);
            for &a in &reference.value {
                for &b in &reference.value {
                    if a != b {
                        prop_assert!(graph.row(a).contains(&(b as u32)));
                    }
                }
            }
        }
    }
}
