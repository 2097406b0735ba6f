//! # hitgraph
//!
//! Sparse correlation graphs over detector hits, and two analyses on them:
//! degeneracy purging (what survives is the densest clique-like core) and
//! multi-level Louvain community detection.
//!
//! ```rust
//! use hitgraph::{CommunityDetection, DegeneracyPurger, GraphBuilder, Louvain};
//! use hitgraph::synth::generate_hits;
//!
//! let hits = generate_hits(200, 40.0, 7);
//! let graph = GraphBuilder::new(20).build(&hits).unwrap();
//! assert_eq!(graph.node_count(), 200);
//!
//! let core = DegeneracyPurger::new().purge(&graph).unwrap();
//! let communities = Louvain::new().detect(&graph).unwrap();
//! assert_eq!(communities.value.len(), 200);
//! assert!(core.converged);
//! ```
//!
//! Every pass is a launch on a [`Device`]: sequential on the host, or on a
//! rayon pool with the default `parallel` feature. Results are identical
//! on both.

pub mod community;
pub mod config;
pub mod correlate;
pub mod csr;
pub mod device;
/// Error types used across `hitgraph`.
pub mod error;
pub mod hits;
pub mod purge;
pub mod scan;
pub mod synth;

pub use community::{modularity, CommunityDetection, Louvain, LouvainConfig};
pub use config::{Config, CorrelateConfig, ScanConfig};
pub use correlate::{CorrelationMode, CorrelationPredicate, GraphBuilder, Match3B, QuadraticDifference};
pub use csr::CsrGraph;
pub use device::Device;
pub use error::{Error, Outcome, Result};
pub use hits::{Hit, HitBatch};
pub use purge::{DegeneracyPurger, DegreeMinimum, PurgeConfig};
pub use scan::{SliceResult, SliceScanner};
