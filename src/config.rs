//! Configuration for the whole pipeline, loadable from TOML.
//!
//! Every field has a default, so a partial file (or an empty one) is valid:
//!
//! ```toml
//! threads = 4
//!
//! [correlate]
//! window_width = 150
//!
//! [correlate.mode]
//! kind = "match3b"
//! road_width = 90.0
//! time_slack = 10.0
//!
//! [purge]
//! block_size = 256
//!
//! [louvain]
//! threshold = 1e-6
//! max_levels = 16
//! ```

use crate::community::{Louvain, LouvainConfig};
use crate::correlate::{CorrelationMode, GraphBuilder};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::purge::{DegeneracyPurger, PurgeConfig};
use crate::scan::SliceScanner;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Graph construction settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelateConfig {
    /// Hits on each side compared with a given hit.
    pub window_width: usize,
    /// Correlation predicate.
    pub mode: CorrelationMode,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        Self {
            window_width: 150,
            mode: CorrelationMode::default(),
        }
    }
}

/// Sliding-slice settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Hits per slice.
    pub slice_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { slice_len: 1000 }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker threads; `None` uses the global rayon pool, `Some(0)` lets
    /// rayon pick the count for a dedicated pool.
    pub threads: Option<usize>,
    /// Graph builder.
    pub correlate: CorrelateConfig,
    /// Degeneracy purger.
    pub purge: PurgeConfig,
    /// Community detector.
    pub louvain: LouvainConfig,
    /// Sliding-slice scan.
    pub scan: ScanConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Launch device described by `threads`.
    pub fn device(&self) -> Result<Device> {
        match self.threads {
            Some(threads) => Device::with_threads(threads),
            None => Ok(Device::default()),
        }
    }

    /// Configured graph builder.
    pub fn graph_builder(&self) -> Result<GraphBuilder> {
        Ok(GraphBuilder::new(self.correlate.window_width)
            .with_mode(self.correlate.mode)
            .with_device(self.device()?))
    }

    /// Configured purger.
    pub fn purger(&self) -> Result<DegeneracyPurger> {
        Ok(DegeneracyPurger::from_config(self.purge).with_device(self.device()?))
    }

    /// Configured community detector.
    pub fn louvain(&self) -> Result<Louvain> {
        Ok(Louvain::from_config(self.louvain).with_device(self.device()?))
    }

    /// Configured slice scanner.
    pub fn scanner(&self) -> Result<SliceScanner> {
        let device = self.device()?;
        Ok(SliceScanner::new(self.scan.slice_len, self.correlate.window_width)
            .with_mode(self.correlate.mode)
            .with_purger(DegeneracyPurger::from_config(self.purge))
            .with_device(device))
    }
}
