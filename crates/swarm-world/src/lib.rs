//! Grid state and transition engine for the swarm automaton.
//!
//! A [`Simulation`] owns the committed [`GridState`]; each tick the
//! [`TransitionEngine`] builds a fresh grid from the previous one.

pub mod engine;
pub mod grid;
pub mod modifier;
pub mod observer;
pub mod random;
pub mod simulation;

pub use engine::{NeighborWeights, Transition, TransitionEngine};
pub use grid::GridState;
pub use modifier::{PointerProximity, ProbabilityModifier, Unmodified};
pub use observer::{StepObserver, StepReport, TimingObserver, TracingObserver};
pub use random::{FixedSource, RandomSource, RngSource};
pub use simulation::{RunSummary, Simulation};
