//! Per-tick transition engine.
//!
//! Every cell of the next grid is computed from the previous grid only, so
//! the sequential and the row-parallel paths produce the same result for
//! the same random draws.

use crate::grid::GridState;
use crate::modifier::{self, ProbabilityModifier, Unmodified};
use crate::random::RandomSource;
use rayon::prelude::*;
use swarm_core::{Direction, EngineConfig, Faction, Point, Position};

/// Weighted neighbor tallies of a single cell.
///
/// Orthogonal neighbors weigh 1.0 and diagonals 0.5. Off-grid neighbors and
/// `Error` cells are void and contribute to none of the sums.
///
/// `non_player` deliberately skips void neighbors even though they are not
/// players: counting them would let `non_player` exceed `total` at the grid
/// edges and push the death probability above 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborWeights {
    /// Weight of all present (non-void) neighbors
    pub total: f64,
    /// Weight of player neighbors
    pub player: f64,
    /// Weight of present neighbors that are not players
    pub non_player: f64,
}

impl NeighborWeights {
    pub fn sample(grid: &GridState, pos: Position) -> Self {
        let mut weights = Self::default();

        for direction in Direction::all() {
            let neighbor = grid.get(pos.neighbor(direction));
            let weight = direction.weight();

            if neighbor.is_present() {
                weights.total += weight;
            }
            if neighbor.is_player() {
                weights.player += weight;
            }
            if neighbor.is_present() && !neighbor.is_player() {
                weights.non_player += weight;
            }
        }

        weights
    }
}

/// Which way a cell can flip this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Empty cell may be taken by the player
    Conversion,
    /// Any other cell may fall back to empty
    Death,
}

impl Transition {
    pub fn for_faction(faction: Faction) -> Self {
        if faction == Faction::Empty {
            Transition::Conversion
        } else {
            Transition::Death
        }
    }

    /// Faction the cell takes if the draw succeeds
    pub fn target(&self) -> Faction {
        match self {
            Transition::Conversion => Faction::Player,
            Transition::Death => Faction::Empty,
        }
    }

    /// Probability from neighbor weights. Zero total weight means nothing can flip.
    pub fn probability(&self, weights: &NeighborWeights) -> f64 {
        if weights.total <= 0.0 {
            return 0.0;
        }
        let numerator = match self {
            Transition::Conversion => weights.player,
            Transition::Death => weights.non_player,
        };
        numerator / weights.total
    }
}

#[derive(Debug)]
pub struct TransitionEngine {
    modifier: Box<dyn ProbabilityModifier>,
    parallel: bool,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self {
            modifier: Box::new(Unmodified),
            parallel: false,
        }
    }
}

impl TransitionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            modifier: modifier::from_weighting(config.pointer_weighting),
            parallel: config.parallel,
        }
    }

    pub fn with_modifier(mut self, modifier: Box<dyn ProbabilityModifier>) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Next faction of one cell. Reads only from `previous` and draws exactly once.
    pub fn next_faction<R: RandomSource>(
        &self,
        previous: &GridState,
        pos: Position,
        pointer: Point,
        rng: &mut R,
    ) -> Faction {
        let current = previous.get(pos);
        let weights = NeighborWeights::sample(previous, pos);
        let transition = Transition::for_faction(current);
        let probability = self
            .modifier
            .modify(transition, transition.probability(&weights), pos, pointer);

        if rng.sample() < probability {
            transition.target()
        } else {
            current
        }
    }

    /// One tick using the configured evaluation strategy
    pub fn advance<R: RandomSource>(&self, previous: &GridState, pointer: Point, rng: &mut R) -> GridState {
        if self.parallel {
            self.step_parallel(previous, pointer, rng)
        } else {
            self.step(previous, pointer, rng)
        }
    }

    /// One tick, cells evaluated in index order
    pub fn step<R: RandomSource>(&self, previous: &GridState, pointer: Point, rng: &mut R) -> GridState {
        let mut next = previous.blank_like();

        for (i, cell) in next.cells_mut().iter_mut().enumerate() {
            let pos = previous.index_to_pos(i);
            *cell = self.next_faction(previous, pos, pointer, rng);
        }

        next
    }

    /// One tick with rows partitioned across the rayon pool.
    ///
    /// Each row gets its own forked source; rows write disjoint slices of the new grid.
    pub fn step_parallel<R: RandomSource>(
        &self,
        previous: &GridState,
        pointer: Point,
        rng: &mut R,
    ) -> GridState {
        let mut next = previous.blank_like();
        let width = previous.width() as usize;
        let mut row_sources: Vec<R> = (0..previous.height()).map(|_| rng.fork()).collect();

        next.cells_mut()
            .par_chunks_mut(width)
            .zip(row_sources.par_iter_mut())
            .enumerate()
            .for_each(|(y, (row, source))| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let pos = Position::new(x as i32, y as i32);
                    *cell = self.next_faction(previous, pos, pointer, source);
                }
            });

        next
    }
}
