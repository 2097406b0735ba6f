//! Sliding-slice scan over long hit batches.
//!
//! A long acquisition window is cut into consecutive slices of `slice_len`
//! hits. Each slice gets its own correlation graph and purge; survivors are
//! shifted back into indices of the full batch.

use crate::correlate::{CorrelationMode, GraphBuilder};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::hits::HitBatch;
use crate::purge::DegeneracyPurger;

/// Purge result for one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceResult {
    /// Index of the slice's first hit in the full batch.
    pub start: usize,
    /// Number of hits in the slice.
    pub len: usize,
    /// Surviving hits, as indices into the full batch.
    pub survivors: Vec<usize>,
    /// Whether the purge reached its fixpoint.
    pub converged: bool,
}

/// Build-and-purge over consecutive slices.
#[derive(Debug, Clone)]
pub struct SliceScanner {
    slice_len: usize,
    builder: GraphBuilder,
    purger: DegeneracyPurger,
}

impl SliceScanner {
    /// Scanner cutting slices of `slice_len` hits, correlating within
    /// `window_width`.
    pub fn new(slice_len: usize, window_width: usize) -> Self {
        Self {
            slice_len,
            builder: GraphBuilder::new(window_width),
            purger: DegeneracyPurger::new(),
        }
    }

    /// Set the correlation mode.
    pub fn with_mode(mut self, mode: CorrelationMode) -> Self {
        self.builder = self.builder.with_mode(mode);
        self
    }

    /// Use a preconfigured purger.
    pub fn with_purger(mut self, purger: DegeneracyPurger) -> Self {
        self.purger = purger;
        self
    }

    /// Set the launch device for both the builder and the purger.
    pub fn with_device(mut self, device: Device) -> Self {
        self.builder = self.builder.with_device(device.clone());
        self.purger = self.purger.with_device(device);
        self
    }

    /// Scan `hits` slice by slice, in order.
    pub fn scan(&self, hits: &HitBatch) -> Result<Vec<SliceResult>> {
        if self.slice_len == 0 {
            return Err(Error::InvalidParameter {
                name: "slice_len",
                message: "must be positive",
            });
        }

        (0..hits.len())
            .step_by(self.slice_len)
            .map(|start| {
                let slice = hits.slice(start, start + self.slice_len);
                let graph = self.builder.build(&slice)?;
                let out = self.purger.purge_shifted(&graph, start)?;
                tracing::debug!(
                    start,
                    hits = slice.len(),
                    edges = graph.edge_count(),
                    survivors = out.value.len(),
                    "slice scanned"
                );
                Ok(SliceResult {
                    start,
                    len: slice.len(),
                    survivors: out.value,
                    converged: out.converged,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::CorrelationPredicate;
    use crate::synth::generate_hits;

    #[test]
    fn test_slices_cover_batch() {
        let hits = generate_hits(250, 50.0, 3);
        let results = SliceScanner::new(100, 20).scan(&hits).unwrap();

        let starts: Vec<usize> = results.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0, 100, 200]);
        let lens: Vec<usize> = results.iter().map(|r| r.len).collect();
        assert_eq!(lens, vec![100, 100, 50]);

        for r in &results {
            assert!(r.converged);
            assert!(r.survivors.iter().all(|&s| s >= r.start && s < r.start + r.len));
            assert!(r.survivors.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_slice_matches_direct_purge() {
        let hits = generate_hits(120, 40.0, 8);
        let results = SliceScanner::new(60, 15)
            .with_device(Device::host())
            .scan(&hits)
            .unwrap();

        let second = hits.slice(60, 120);
        let graph = GraphBuilder::new(15).build(&second).unwrap();
        let direct = DegeneracyPurger::new().purge(&graph).unwrap();
        let shifted: Vec<usize> = direct.value.iter().map(|i| i + 60).collect();
        assert_eq!(results[1].survivors, shifted);
    }

    #[test]
    fn test_survivors_are_correlated() {
        let hits = generate_hits(90, 30.0, 21);
        let mode = CorrelationMode::default();
        for r in SliceScanner::new(45, 10).scan(&hits).unwrap() {
            for &a in &r.survivors {
                for &b in &r.survivors {
                    if a != b {
                        assert!(a.abs_diff(b) <= 10);
                        assert!(mode.correlated(&hits.get(a), &hits.get(b)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        let results = SliceScanner::new(10, 5).scan(&HitBatch::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_slice_len_rejected() {
        let err = SliceScanner::new(0, 5).scan(&generate_hits(10, 1.0, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "slice_len", .. }));
    }
}
