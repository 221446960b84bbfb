//! Simulation driver facade: owns the committed grid and advances it tick by tick.

use crate::engine::TransitionEngine;
use crate::grid::GridState;
use crate::observer::{StepObserver, StepReport};
use crate::random::{RandomSource, RngSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use swarm_core::{Error, Faction, FactionCounts, Point, Result, SimulationConfig};
use tracing::{info, instrument};

pub struct Simulation<R = RngSource> {
    world: GridState,
    engine: TransitionEngine,
    pointer: Point,
    rng: R,
    config: SimulationConfig,
    observers: Vec<Arc<dyn StepObserver>>,
    tick_count: u64,
    needs_redraw: bool,
}

impl Simulation<RngSource> {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => RngSource::from_seed(seed),
            None => RngSource::from_entropy(),
        };
        Self::with_random_source(config, rng)
    }
}

impl<R: RandomSource> Simulation<R> {
    pub fn with_random_source(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let width = grid_dimension(config.grid.width, &config)?;
        let height = grid_dimension(config.grid.height, &config)?;
        let world = GridState::seeded(width, height, config.grid.seed_radius)?;
        let engine = TransitionEngine::new(&config.engine);
        let center = world.center();

        Ok(Self {
            world,
            engine,
            pointer: Point::new(center.x as f64, center.y as f64),
            rng,
            config,
            observers: Vec::new(),
            tick_count: 0,
            needs_redraw: true,
        })
    }

    pub fn add_observer(&mut self, observer: Arc<dyn StepObserver>) {
        self.observers.push(observer);
    }

    pub fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// The committed grid, read-only for renderers
    pub fn world(&self) -> &GridState {
        &self.world
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns whether the world changed since the last call, clearing the flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Advance one tick, replacing the committed grid wholesale
    pub fn tick(&mut self) -> StepReport {
        let started = Instant::now();
        let next = self.engine.advance(&self.world, self.pointer, &mut self.rng);
        let duration = started.elapsed();

        self.world = next;
        self.tick_count += 1;
        self.needs_redraw = true;

        let report = StepReport {
            tick: self.tick_count,
            duration,
            counts: self.world.counts(),
        };
        for observer in &self.observers {
            observer.on_step(&report);
        }
        report
    }

    /// Re-seed the circular player region and restart the tick counter
    pub fn reset(&mut self) {
        self.world.reseed(self.config.grid.seed_radius);
        self.tick_count = 0;
        self.needs_redraw = true;
        info!(
            width = self.world.width(),
            height = self.world.height(),
            seed_radius = self.config.grid.seed_radius,
            "Simulation reset"
        );
    }

    /// Run the configured number of ticks
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks))]
    pub fn run(&mut self) -> RunSummary {
        info!(
            "Starting simulation on a {}x{} grid for {} ticks",
            self.world.width(),
            self.world.height(),
            self.config.num_ticks
        );

        let initial_counts = self.world.counts();
        let mut peak_player_cells = initial_counts.get(Faction::Player);
        let mut step_time = Duration::ZERO;
        let start_tick = self.tick_count;

        for _ in 0..self.config.num_ticks {
            let report = self.tick();
            step_time += report.duration;
            peak_player_cells = peak_player_cells.max(report.counts.get(Faction::Player));

            let interval = self.config.report_interval;
            if interval > 0 && report.tick % interval == 0 {
                self.emit_population_metrics(&report);
            }
        }

        let ticks_run = self.tick_count - start_tick;
        let final_counts = self.world.counts();
        let summary = RunSummary {
            total_ticks: ticks_run,
            width: self.world.width(),
            height: self.world.height(),
            initial_counts,
            final_counts,
            peak_player_cells,
            player_share: final_counts.player_share(),
            mean_step_micros: if ticks_run > 0 {
                step_time.as_micros() as u64 / ticks_run
            } else {
                0
            },
        };

        info!(
            event = "run_summary",
            total_ticks = summary.total_ticks,
            final_player_cells = summary.final_counts.get(Faction::Player),
            peak_player_cells = summary.peak_player_cells,
            player_share = format!("{:.2}%", summary.player_share * 100.0),
            mean_step_micros = summary.mean_step_micros,
            "Run complete"
        );

        summary
    }

    fn emit_population_metrics(&self, report: &StepReport) {
        info!(
            event = "population_metrics",
            tick = report.tick,
            player_cells = report.counts.get(Faction::Player),
            empty_cells = report.counts.get(Faction::Empty),
            player_share = format!("{:.2}%", report.counts.player_share() * 100.0),
            step_micros = report.duration.as_micros() as u64,
            "Population snapshot"
        );
    }
}

fn grid_dimension(value: u32, config: &SimulationConfig) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidDimensions {
        width: config.grid.width as i64,
        height: config.grid.height as i64,
    })
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_ticks: u64,
    pub width: i32,
    pub height: i32,
    pub initial_counts: FactionCounts,
    pub final_counts: FactionCounts,
    pub peak_player_cells: u64,
    pub player_share: f64,
    pub mean_step_micros: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::TimingObserver;
    use crate::random::FixedSource;
    use swarm_core::{GridConfig, Position};

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            num_ticks: 10,
            seed: Some(42),
            report_interval: 5,
            grid: GridConfig {
                width: 60,
                height: 50,
                seed_radius: 20.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.world().len(), 60 * 50);
        assert_eq!(sim.world().get(Position::new(30, 25)), Faction::Player);
        assert_eq!(sim.pointer(), Point::new(30.0, 25.0));
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.grid.height = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_tick_and_redraw() {
        let mut sim = Simulation::new(small_config()).unwrap();
        assert!(sim.take_redraw());
        assert!(!sim.take_redraw());

        let report = sim.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(report.counts.total(), 60 * 50);
        assert!(sim.take_redraw());
    }

    #[test]
    fn test_reset_restores_seed_region() {
        let mut sim = Simulation::with_random_source(small_config(), FixedSource(0.0)).unwrap();
        let seeded = sim.world().clone();
        sim.tick();
        sim.tick();
        assert_ne!(sim.world(), &seeded);

        sim.reset();
        assert_eq!(sim.world(), &seeded);
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn test_observers_notified() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let timing = Arc::new(TimingObserver::default());
        sim.add_observer(timing.clone());

        let summary = sim.run();
        assert_eq!(summary.total_ticks, 10);
        assert_eq!(timing.snapshot().samples, 10);
        assert_eq!(summary.final_counts.total(), 60 * 50);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let mut a = Simulation::new(small_config()).unwrap();
        let mut b = Simulation::new(small_config()).unwrap();
        a.run();
        b.run();
        assert_eq!(a.world(), b.world());
    }
}
