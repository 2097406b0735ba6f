//! Louvain algorithm for community detection.
//!
//! Fast modularity optimization through local node moves and graph aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! Louvain is a multi-level, greedy modularity optimization algorithm:
//!
//! 1. **Phase 1 (Local Moving)**: Start with each node in its own community.
//!    Repeatedly move nodes to neighboring community with highest modularity
//!    gain until no improvement.
//!
//! 2. **Phase 2 (Aggregation)**: Build a meta-graph where communities become
//!    single nodes. Edge weights are sums of edges between communities.
//!    Self-loops represent internal community edges.
//!
//! 3. **Iterate**: Repeat phases 1-2 on the meta-graph until modularity
//!    stops improving.
//!
//! ## Local Moving Order
//!
//! Nodes are visited in ascending index order and each move is applied
//! immediately, so later nodes see the communities left by earlier ones.
//! The fixed order makes the result independent of the device. Only the
//! evaluation passes (community degrees, internal weights, partial
//! modularity) are launches.
//!
//! A sweep is committed only if the modularity of the whole assignment
//! beats the committed modularity by more than the threshold; otherwise the
//! level ends with the committed partition.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

use super::level::{compact_labels, LevelGraph};
use super::modularity::{evaluate, Evaluation};
use super::traits::CommunityDetection;
use crate::csr::CsrGraph;
use crate::device::Device;
use crate::error::{Error, Outcome, Result};
use serde::{Deserialize, Serialize};

/// Settings for [`Louvain`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Minimum modularity improvement to continue.
    pub threshold: f64,
    /// Maximum local-moving iterations per level.
    pub max_iter: usize,
    /// Maximum levels of aggregation.
    pub max_levels: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            threshold: 1e-6,
            max_iter: 100,
            max_levels: 32,
        }
    }
}

/// Louvain community detection algorithm.
#[derive(Debug, Clone, Default)]
pub struct Louvain {
    config: LouvainConfig,
    device: Device,
}

/// Committed state of the local-moving phase on one level.
struct LevelResult {
    community: Vec<usize>,
    modularity: f64,
    iterations: usize,
    converged: bool,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector from a config.
    pub fn from_config(config: LouvainConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the minimum modularity gain.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set maximum iterations per level.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    /// Set maximum aggregation levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.config.max_levels = levels;
        self
    }

    /// Set the launch device.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Phase 1 on one level: local-moving sweeps until a sweep no longer
    /// improves modularity.
    fn local_moving(&self, level: &LevelGraph) -> Result<LevelResult> {
        let n = level.node_count();
        let mut community: Vec<usize> = (0..n).collect();
        let mut committed = evaluate(&self.device, level, &community)?;
        let phase_start = committed.modularity;

        for iteration in 0..self.config.max_iter {
            let proposal = self.move_nodes(level, &community, &committed);
            let candidate = evaluate(&self.device, level, &proposal)?;
            tracing::trace!(
                iteration,
                modularity = candidate.modularity,
                committed = committed.modularity,
                "local moving step"
            );

            if candidate.modularity - committed.modularity <= self.config.threshold {
                return Ok(LevelResult {
                    community,
                    modularity: committed.modularity,
                    iterations: iteration + 1,
                    converged: true,
                });
            }
            community = proposal;
            committed = candidate;
        }

        tracing::warn!(
            max_iter = self.config.max_iter,
            start = phase_start,
            modularity = committed.modularity,
            "local moving iteration budget exhausted"
        );
        Ok(LevelResult {
            community,
            modularity: committed.modularity,
            iterations: self.config.max_iter,
            converged: false,
        })
    }

    /// One sweep over all nodes in ascending order.
    ///
    /// Each node moves to the neighbouring community with the largest
    /// positive gain, measured against the assignment as left by the nodes
    /// before it. Community totals are updated after every move, so every
    /// accepted move raises modularity.
    fn move_nodes(&self, level: &LevelGraph, community: &[usize], committed: &Evaluation) -> Vec<usize> {
        let m = level.total_weight() as f64 / 2.0;
        let mut community = community.to_vec();
        let mut totals = committed.totals.clone();
        let mut links: Vec<(usize, u64)> = Vec::new();

        for i in 0..level.node_count() {
            let own = community[i];
            let degree = level.degree(i);

            // Weight from i to each neighbouring community, by community id.
            links.clear();
            links.extend(level.row(i).map(|(j, w)| (community[j], w)));
            links.sort_unstable_by_key(|&(c, _)| c);
            links.dedup_by(|next, kept| {
                if next.0 == kept.0 {
                    kept.1 += next.1;
                    true
                } else {
                    false
                }
            });

            let k_i_own = links
                .iter()
                .find(|&&(c, _)| c == own)
                .map_or(0.0, |&(_, w)| w as f64);
            let own_rest = (totals[own] - degree) as f64;
            let k_i = degree as f64;

            let mut best = own;
            let mut best_gain = 0.0;
            for &(c, w) in &links {
                if c == own {
                    continue;
                }
                let gain = (w as f64 - k_i_own) / m - k_i * (totals[c] as f64 - own_rest) / (2.0 * m * m);
                if gain > best_gain {
                    best = c;
                    best_gain = gain;
                }
            }

            if best != own {
                totals[own] -= degree;
                totals[best] += degree;
                community[i] = best;
            }
        }
        community
    }

    fn validate(&self) -> Result<()> {
        if self.config.threshold.is_nan() || self.config.threshold < 0.0 {
            return Err(Error::InvalidParameter {
                name: "threshold",
                message: "must be a non-negative number",
            });
        }
        Ok(())
    }
}

impl CommunityDetection for Louvain {
    fn detect(&self, graph: &CsrGraph) -> Result<Outcome<Vec<usize>>> {
        self.validate()?;
        let n = graph.node_count();

        if graph.edge_count() == 0 {
            // No edges: each node is its own community
            return Ok(Outcome::converged((0..n).collect(), 0));
        }

        let mut level = LevelGraph::from_csr(graph);
        let mut membership: Vec<usize> = (0..n).collect();
        let mut graph_modularity = evaluate(&self.device, &level, &membership)?.modularity;
        let mut iterations = 0;
        let mut within_budget = true;

        for depth in 0..self.config.max_levels {
            let phase = self.local_moving(&level)?;
            iterations += phase.iterations;
            within_budget &= phase.converged;
            tracing::debug!(
                level = depth,
                nodes = level.node_count(),
                modularity = phase.modularity,
                previous = graph_modularity,
                "louvain level"
            );

            if phase.modularity - graph_modularity <= self.config.threshold {
                let communities = compact_labels(&membership).1;
                tracing::debug!(nodes = n, communities, iterations, "louvain finished");
                return Ok(Outcome {
                    value: membership,
                    iterations,
                    converged: within_budget,
                });
            }
            graph_modularity = phase.modularity;

            // Phase 2: aggregate
            let (compact, k) = compact_labels(&phase.community);
            for c in membership.iter_mut() {
                *c = compact[*c];
            }
            level = level.aggregate(&self.device, &compact, k)?;
        }

        tracing::warn!(
            max_levels = self.config.max_levels,
            modularity = graph_modularity,
            "louvain level budget exhausted"
        );
        Ok(Outcome::exhausted(membership, iterations))
    }

    fn threshold(&self) -> f64 {
        self.config.threshold
    }
}
