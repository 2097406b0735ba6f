//! Block-wise minimum-degree reduction.

use crate::device::Device;
use crate::error::Result;

/// Minimum degree over live nodes, how many nodes hold it, and how many
/// nodes are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeMinimum {
    /// Smallest degree among live nodes (0 when nothing is live).
    pub minimum: u32,
    /// Live nodes whose degree equals `minimum`.
    pub at_minimum: usize,
    /// Live nodes.
    pub live: usize,
}

impl DegreeMinimum {
    const IDENTITY: Self = Self {
        minimum: u32::MAX,
        at_minimum: 0,
        live: 0,
    };

    fn push(self, degree: u32) -> Self {
        self.combine(Self {
            minimum: degree,
            at_minimum: 1,
            live: 1,
        })
    }

    fn combine(self, other: Self) -> Self {
        let live = self.live + other.live;
        if self.live == 0 {
            return Self { live, ..other };
        }
        if other.live == 0 {
            return Self { live, ..self };
        }
        match self.minimum.cmp(&other.minimum) {
            std::cmp::Ordering::Less => Self { live, ..self },
            std::cmp::Ordering::Greater => Self { live, ..other },
            std::cmp::Ordering::Equal => Self {
                minimum: self.minimum,
                at_minimum: self.at_minimum + other.at_minimum,
                live,
            },
        }
    }

    /// Whether the live subgraph is a clique or empty: every live node is
    /// adjacent to all other live nodes, so no node can be dropped.
    pub fn is_fixpoint(&self) -> bool {
        self.minimum as usize + 1 >= self.live
    }
}

/// Reduce per block on the device, then combine the block partials on the host.
pub(crate) fn minimum_degree(
    device: &Device,
    degrees: &[u32],
    live: &[bool],
    block_size: usize,
) -> Result<DegreeMinimum> {
    let n = degrees.len();
    let blocks = n.div_ceil(block_size);
    let partials = device.launch_map("minimum_degree", blocks, |b| {
        let start = b * block_size;
        let end = (start + block_size).min(n);
        (start..end)
            .filter(|&i| live[i])
            .fold(DegreeMinimum::IDENTITY, |acc, i| acc.push(degrees[i]))
    })?;
    let combined = partials
        .into_iter()
        .fold(DegreeMinimum::IDENTITY, DegreeMinimum::combine);
    Ok(if combined.live == 0 {
        DegreeMinimum {
            minimum: 0,
            at_minimum: 0,
            live: 0,
        }
    } else {
        combined
    })
}
