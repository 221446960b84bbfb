//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Grid configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of the grid in cells
    pub width: u32,
    /// Height of the grid in cells
    pub height: u32,
    /// Radius of the player region seeded around the grid center
    pub seed_radius: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed_radius: 20.0,
        }
    }
}

/// How the pointer position influences conversion
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerWeighting {
    /// Pointer is ignored
    #[default]
    None,
    /// Conversion probability is scaled by `(reference_distance / distance)^exponent`
    Proximity { reference_distance: f64, exponent: f64 },
}

impl PointerWeighting {
    pub fn proximity() -> Self {
        PointerWeighting::Proximity {
            reference_distance: 64.0,
            exponent: 0.2,
        }
    }
}

/// Transition engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate rows on the rayon thread pool
    pub parallel: bool,
    /// Pointer influence on conversion probability
    pub pointer_weighting: PointerWeighting,
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks for a headless run
    pub num_ticks: u64,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Ticks between population log snapshots (0 disables them)
    pub report_interval: u64,
    /// Grid configuration
    pub grid: GridConfig,
    /// Engine configuration
    pub engine: EngineConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 1_000,
            seed: None,
            report_interval: 100,
            grid: GridConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading simulation config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        if !self.grid.seed_radius.is_finite() || self.grid.seed_radius < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "seed radius must be a finite non-negative number, got {}",
                self.grid.seed_radius
            )));
        }

        if let PointerWeighting::Proximity {
            reference_distance,
            exponent,
        } = self.engine.pointer_weighting
        {
            let valid = |v: f64| v.is_finite() && v > 0.0;
            if !valid(reference_distance) || !valid(exponent) {
                return Err(Error::InvalidConfig(format!(
                    "proximity weighting needs positive parameters, got reference_distance={} exponent={}",
                    reference_distance, exponent
                )));
            }
        }

        Ok(())
    }
}
