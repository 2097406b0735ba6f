//! Correlation graph construction.
//!
//! Hits are compared pairwise inside a sliding index window with a
//! [`CorrelationPredicate`], and the resulting graph is stored as a
//! [`CsrGraph`](crate::csr::CsrGraph).
//!
//! ```rust
//! use hitgraph::correlate::{CorrelationMode, GraphBuilder, Match3B};
//! use hitgraph::synth::generate_hits;
//!
//! let hits = generate_hits(500, 18.0, 42);
//! let graph = GraphBuilder::new(150).build(&hits).unwrap();
//! assert_eq!(graph.node_count(), 500);
//!
//! // Match 3B expects times in nanoseconds.
//! let hits_ns = hits.scale_time(1.0 / hitgraph::correlate::SPEED_OF_LIGHT);
//! let graph_3b = GraphBuilder::new(150)
//!     .with_mode(CorrelationMode::Match3B(Match3B::default()))
//!     .build(&hits_ns)
//!     .unwrap();
//! assert!(graph_3b.is_symmetric());
//! ```

mod builder;
mod predicate;

pub use builder::GraphBuilder;
pub use predicate::{
    CorrelationMode, CorrelationPredicate, Match3B, QuadraticDifference, SPEED_OF_LIGHT,
    WATER_INDEX,
};
