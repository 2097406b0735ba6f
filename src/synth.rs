//! Seeded synthetic inputs: random hit batches, banded random correlation
//! tables and inserted cliques.
//!
//! Used to exercise the builder, the purger and the detector without real
//! detector data.

use crate::error::{Error, Result};
use crate::hits::HitBatch;
use ndarray::Array2;
use rand::prelude::*;
use rand::seq::index;

/// Random hits: positions uniform in a cube of side `spread`, time-like
/// values uniform in `[0, 2·spread)` and sorted ascending.
pub fn generate_hits(n: usize, spread: f32, seed: u64) -> HitBatch {
    let mut rng = StdRng::seed_from_u64(seed);
    let coord = |rng: &mut StdRng| -> Vec<f32> {
        (0..n).map(|_| rng.random::<f32>() * spread).collect()
    };
    let x = coord(&mut rng);
    let y = coord(&mut rng);
    let z = coord(&mut rng);
    let mut t: Vec<f32> = (0..n).map(|_| rng.random::<f32>() * 2.0 * spread).collect();
    t.sort_by(f32::total_cmp);
    // Columns are built with equal lengths.
    HitBatch::new(x, y, z, t).unwrap_or_default()
}

/// Symmetric random adjacency where each pair with `0 < |i - j| <= window`
/// is connected with the given probability.
pub fn random_correlations(n: usize, window: usize, probability: f64, seed: u64) -> Array2<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n.min(i + window + 1) {
            if rng.random_bool(probability.clamp(0.0, 1.0)) {
                m[[i, j]] = 1;
                m[[j, i]] = 1;
            }
        }
    }
    m
}

/// Insert a clique of `size` distinct nodes that all lie within one window.
///
/// Returns the clique members in ascending order.
pub fn insert_clique(
    matrix: &mut Array2<u8>,
    window: usize,
    size: usize,
    seed: u64,
) -> Result<Vec<usize>> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(Error::shape(
            "square adjacency matrix",
            format!("{} x {}", n, matrix.ncols()),
        ));
    }
    let span = (window + 1).min(n);
    if size > span {
        return Err(Error::InvalidParameter {
            name: "size",
            message: "clique does not fit inside one window",
        });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let start = rng.random_range(0..=n - span);
    let mut members: Vec<usize> = index::sample(&mut rng, span, size)
        .into_iter()
        .map(|k| start + k)
        .collect();
    members.sort_unstable();
    for &a in &members {
        for &b in &members {
            if a != b {
                matrix[[a, b]] = 1;
            }
        }
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hits_is_seeded() {
        let a = generate_hits(50, 10.0, 7);
        let b = generate_hits(50, 10.0, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!((1..50).all(|i| a.get(i - 1).t <= a.get(i).t));
    }

    #[test]
    fn test_random_correlations_banded_and_symmetric() {
        let m = random_correlations(40, 5, 0.5, 1);
        for i in 0..40 {
            assert_eq!(m[[i, i]], 0);
            for j in 0..40 {
                assert_eq!(m[[i, j]], m[[j, i]]);
                if i.abs_diff(j) > 5 {
                    assert_eq!(m[[i, j]], 0);
                }
            }
        }
    }

    #[test]
    fn test_insert_clique_within_window() {
        let mut m = random_correlations(100, 20, 0.0, 3);
        let clique = insert_clique(&mut m, 20, 8, 3).unwrap();
        assert_eq!(clique.len(), 8);
        assert!(clique.last().unwrap() - clique.first().unwrap() <= 20);
        let edges: usize = m.iter().map(|&v| v as usize).sum();
        assert_eq!(edges, 8 * 7);
    }

    #[test]
    fn test_insert_clique_too_large() {
        let mut m = Array2::zeros((10, 10));
        assert!(insert_clique(&mut m, 3, 5, 0).is_err());
    }
}
