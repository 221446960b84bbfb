//! Headless driver for the swarm automaton.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use swarm_core::SimulationConfig;
use swarm_world::{Simulation, TimingObserver, TracingObserver};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "swarm", version, about = "Run the swarm automaton headless and print a summary")]
struct Cli {
    /// JSON simulation config; defaults are used when omitted.
    #[arg(short, long, env = "SWARM_CONFIG")]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long)]
    ticks: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Random seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate rows in parallel.
    #[arg(long)]
    parallel: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(ticks) = self.ticks {
            config.num_ticks = ticks;
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.parallel {
            config.engine.parallel = true;
        }

        config.validate().context("invalid simulation config")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.json_logs);

    let config = cli.load_config()?;
    info!(
        width = config.grid.width,
        height = config.grid.height,
        parallel = config.engine.parallel,
        "Starting swarm simulation"
    );

    let mut simulation = Simulation::new(config).context("failed to create simulation")?;
    let timing = Arc::new(TimingObserver::default());
    simulation.add_observer(timing.clone());
    simulation.add_observer(Arc::new(TracingObserver));

    let summary = simulation.run();

    let snapshot = timing.snapshot();
    info!(
        samples = snapshot.samples,
        mean_us = snapshot.mean().as_micros() as u64,
        max_us = snapshot.max.as_micros() as u64,
        "Step timing"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let cli = Cli::parse_from([
            "swarm", "--ticks", "5", "--width", "32", "--height", "16", "--seed", "3", "--parallel",
        ]);
        let config = Cli { config: None, ..cli }.load_config().unwrap();
        assert_eq!(config.num_ticks, 5);
        assert_eq!(config.grid.width, 32);
        assert_eq!(config.grid.height, 16);
        assert_eq!(config.seed, Some(3));
        assert!(config.engine.parallel);
    }

    #[test]
    fn test_zero_width_rejected() {
        let cli = Cli::parse_from(["swarm", "--width", "0"]);
        assert!(Cli { config: None, ..cli }.load_config().is_err());
    }
}
