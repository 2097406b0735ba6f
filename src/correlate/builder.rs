//! Two-pass CSR construction.
//!
//! The number of correlated pairs is unknown until every hit has been
//! examined, and growing output buffers from parallel workers would need
//! atomics. The build therefore runs the predicate twice:
//!
//! 1. **count**: each hit counts its correlated neighbours → `degrees`
//! 2. **size** (host): inclusive prefix sums, exact `col_idx` allocation
//! 3. **fill**: each hit writes its neighbours into its own row slice
//!
//! Candidates for hit `i` are all `j != i` with `|i - j| <= window_width`,
//! visited in ascending order in both passes.

use super::predicate::{CorrelationMode, CorrelationPredicate};
use crate::csr::CsrGraph;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::hits::HitBatch;
use std::ops::RangeInclusive;

/// Builds correlation graphs from hit batches.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    window_width: usize,
    mode: CorrelationMode,
    device: Device,
}

impl GraphBuilder {
    /// Builder with the given sliding window width and the default mode.
    pub fn new(window_width: usize) -> Self {
        Self {
            window_width,
            mode: CorrelationMode::default(),
            device: Device::default(),
        }
    }

    /// Set the correlation mode.
    pub fn with_mode(mut self, mode: CorrelationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the launch device.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Sliding window width.
    pub fn window_width(&self) -> usize {
        self.window_width
    }

    /// Correlation mode used by [`GraphBuilder::build`].
    pub fn mode(&self) -> CorrelationMode {
        self.mode
    }

    /// Build the correlation graph using the configured mode.
    pub fn build(&self, hits: &HitBatch) -> Result<CsrGraph> {
        let mode = self.mode;
        self.build_with(hits, &mode)
    }

    /// Build the correlation graph with an arbitrary predicate.
    pub fn build_with<P>(&self, hits: &HitBatch, predicate: &P) -> Result<CsrGraph>
    where
        P: CorrelationPredicate + ?Sized,
    {
        let n = hits.len();
        if n > u32::MAX as usize {
            return Err(Error::shape(
                format!("at most {} hits", u32::MAX),
                format!("{n} hits"),
            ));
        }

        let degrees: Vec<u32> = self.device.launch_map("count_correlations", n, |i| {
            let hit = hits.get(i);
            self.candidates(i, n)
                .filter(|&j| j != i && predicate.correlated(&hit, &hits.get(j)))
                .count() as u32
        })?;

        let mut prefix_sums = Vec::with_capacity(n);
        let mut total = 0usize;
        for &d in &degrees {
            total += d as usize;
            prefix_sums.push(total);
        }

        let mut col_idx: Vec<u32> = Vec::new();
        col_idx
            .try_reserve_exact(total)
            .map_err(|e| Error::Accelerator {
                kernel: "allocate_col_idx",
                message: e.to_string(),
            })?;
        col_idx.resize(total, 0);

        let rows = split_rows(&mut col_idx, &degrees);
        let consistent: Vec<bool> =
            self.device
                .launch_rows("fill_correlations", rows, |i, row: &mut [u32]| {
                    let hit = hits.get(i);
                    let mut cursor = 0usize;
                    for j in self.candidates(i, n) {
                        if j == i || !predicate.correlated(&hit, &hits.get(j)) {
                            continue;
                        }
                        if cursor == row.len() {
                            return false;
                        }
                        row[cursor] = j as u32;
                        cursor += 1;
                    }
                    cursor == row.len()
                })?;

        if let Some(row) = consistent.iter().position(|&ok| !ok) {
            return Err(Error::Accelerator {
                kernel: "fill_correlations",
                message: format!(
                    "row {row} disagrees with its count pass; predicate is not deterministic"
                ),
            });
        }

        tracing::debug!(
            nodes = n,
            edges = total,
            window = self.window_width,
            "built correlation graph"
        );
        Ok(CsrGraph::from_parts_unchecked(col_idx, prefix_sums, degrees))
    }

    fn candidates(&self, i: usize, n: usize) -> RangeInclusive<usize> {
        let lo = i.saturating_sub(self.window_width);
        let hi = i.saturating_add(self.window_width).min(n.saturating_sub(1));
        lo..=hi
    }
}

/// Split `col_idx` into one mutable slice per row.
fn split_rows<'a>(mut col_idx: &'a mut [u32], degrees: &[u32]) -> Vec<&'a mut [u32]> {
    let mut rows = Vec::with_capacity(degrees.len());
    for &d in degrees {
        let (row, rest) = std::mem::take(&mut col_idx).split_at_mut(d as usize);
        rows.push(row);
        col_idx = rest;
    }
    rows
}
