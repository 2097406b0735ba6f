//! Pairwise correlation predicates.

use crate::hits::Hit;
use serde::{Deserialize, Serialize};

/// Speed of light in vacuum (m/ns).
pub const SPEED_OF_LIGHT: f32 = 0.299_792_458;

/// Refractive index of sea water used for causality checks.
pub const WATER_INDEX: f32 = 1.380_085_1;

/// Decides whether two hits are correlated.
///
/// Implementations must be deterministic and symmetric: the graph builder
/// evaluates every pair from both endpoints, once in the count pass and
/// once in the fill pass.
pub trait CorrelationPredicate: Sync {
    /// Whether `a` and `b` are correlated.
    fn correlated(&self, a: &Hit, b: &Hit) -> bool;
}

impl<F> CorrelationPredicate for F
where
    F: Fn(&Hit, &Hit) -> bool + Sync,
{
    fn correlated(&self, a: &Hit, b: &Hit) -> bool {
        self(a, b)
    }
}

/// Quadratic-difference test.
///
/// `t` holds `c·time` in metres. Two hits correlate when their separation
/// is space-like: `(Δct)² < |Δx|²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadraticDifference;

impl CorrelationPredicate for QuadraticDifference {
    #[inline]
    fn correlated(&self, a: &Hit, b: &Hit) -> bool {
        let dct = a.t - b.t;
        dct * dct < a.distance_sq(b)
    }
}

/// Road-width causality test with `t` in nanoseconds.
///
/// Within `road_width` of each other, two hits may be connected by direct
/// light in water (`Δt <= d·n/c`). Further apart they must be reachable by
/// a muon travelling at `c` that emits Cherenkov light onto both, which
/// adds at most `road_width·tan θc` of path (`cos θc = 1/n`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Match3B {
    /// Maximum perpendicular distance of a hit from the track (m).
    pub road_width: f32,
    /// Extra time slack for PMT jitter and scattering (ns).
    pub time_slack: f32,
}

impl Default for Match3B {
    fn default() -> Self {
        Self {
            road_width: 90.0,
            time_slack: 10.0,
        }
    }
}

impl Match3B {
    fn tan_cherenkov() -> f32 {
        (WATER_INDEX * WATER_INDEX - 1.0).sqrt()
    }
}

impl CorrelationPredicate for Match3B {
    fn correlated(&self, a: &Hit, b: &Hit) -> bool {
        let d = a.distance_sq(b).sqrt();
        let dt = (a.t - b.t).abs();
        let max_dt = if d <= self.road_width {
            d * WATER_INDEX / SPEED_OF_LIGHT
        } else {
            (d + self.road_width * Self::tan_cherenkov()) / SPEED_OF_LIGHT
        };
        dt <= max_dt + self.time_slack
    }
}

/// Built-in correlation modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CorrelationMode {
    /// [`QuadraticDifference`]; `t` is `c·time` in metres.
    #[default]
    QuadraticDifference,
    /// [`Match3B`]; `t` is in nanoseconds.
    #[serde(rename = "match3b")]
    Match3B(Match3B),
}

impl CorrelationPredicate for CorrelationMode {
    #[inline]
    fn correlated(&self, a: &Hit, b: &Hit) -> bool {
        match self {
            CorrelationMode::QuadraticDifference => QuadraticDifference.correlated(a, b),
            CorrelationMode::Match3B(m) => m.correlated(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hit(x: f32, t: f32) -> Hit {
        Hit { x, y: 0.0, z: 0.0, t }
    }

    #[test]
    fn test_quadratic_difference_space_like() {
        assert!(QuadraticDifference.correlated(&hit(0.0, 0.0), &hit(10.0, 5.0)));
        assert!(!QuadraticDifference.correlated(&hit(0.0, 0.0), &hit(10.0, 20.0)));
        // light-like boundary is excluded
        assert!(!QuadraticDifference.correlated(&hit(0.0, 0.0), &hit(10.0, 10.0)));
    }

    #[test]
    fn test_match3b_regimes() {
        let m = Match3B::default();
        // 30 m apart: direct light takes ~138 ns
        assert!(m.correlated(&hit(0.0, 0.0), &hit(30.0, 140.0)));
        assert!(!m.correlated(&hit(0.0, 0.0), &hit(30.0, 160.0)));
        // 300 m apart: bound is (300 + 90·tan θc)/c + slack
        let bound = (300.0 + 90.0 * Match3B::tan_cherenkov()) / SPEED_OF_LIGHT + 10.0;
        assert!(m.correlated(&hit(0.0, 0.0), &hit(300.0, bound - 1.0)));
        assert!(!m.correlated(&hit(0.0, 0.0), &hit(300.0, bound + 1.0)));
    }

    #[test]
    fn test_closure_predicate() {
        let near = |a: &Hit, b: &Hit| (a.x - b.x).abs() < 1.0;
        assert!(near.correlated(&hit(0.0, 0.0), &hit(0.5, 0.0)));
        assert!(!near.correlated(&hit(0.0, 0.0), &hit(2.0, 0.0)));
    }

    proptest! {
        #[test]
        fn predicates_are_symmetric(
            a in prop::array::uniform4(-500.0f32..500.0),
            b in prop::array::uniform4(-500.0f32..500.0),
        ) {
            let ha = Hit { x: a[0], y: a[1], z: a[2], t: a[3] };
            let hb = Hit { x: b[0], y: b[1], z: b[2], t: b[3] };
            let modes = [CorrelationMode::QuadraticDifference, CorrelationMode::Match3B(Match3B::default())];
            for mode in modes {
                prop_assert_eq!(mode.correlated(&ha, &hb), mode.correlated(&hb, &ha));
            }
        }
    }
}
