//! Pluggable adjustments to transition probabilities.

use crate::engine::Transition;
use std::fmt::Debug;
use swarm_core::{Point, PointerWeighting, Position};

pub trait ProbabilityModifier: Send + Sync + Debug {
    /// Adjust `probability` for the cell at `cell`. The result must stay in `[0, 1]`.
    fn modify(&self, transition: Transition, probability: f64, cell: Position, pointer: Point) -> f64;
}

/// Leaves every probability as computed from the neighbor weights
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmodified;

impl ProbabilityModifier for Unmodified {
    fn modify(&self, _transition: Transition, probability: f64, _cell: Position, _pointer: Point) -> f64 {
        probability
    }
}

/// Boosts conversion near the pointer: `closeness = (reference_distance / distance)^exponent`.
///
/// Death probabilities are left alone. Distances below one cell are clamped to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerProximity {
    pub reference_distance: f64,
    pub exponent: f64,
}

impl PointerProximity {
    pub fn closeness(&self, cell: Position, pointer: Point) -> f64 {
        let distance = pointer.distance_to(cell).max(1.0);
        (self.reference_distance / distance).powf(self.exponent)
    }
}

impl Default for PointerProximity {
    fn default() -> Self {
        Self {
            reference_distance: 64.0,
            exponent: 0.2,
        }
    }
}

impl ProbabilityModifier for PointerProximity {
    fn modify(&self, transition: Transition, probability: f64, cell: Position, pointer: Point) -> f64 {
        match transition {
            Transition::Conversion => (probability * self.closeness(cell, pointer)).clamp(0.0, 1.0),
            Transition::Death => probability,
        }
    }
}

/// Build the modifier selected by configuration
pub fn from_weighting(weighting: PointerWeighting) -> Box<dyn ProbabilityModifier> {
    match weighting {
        PointerWeighting::None => Box::new(Unmodified),
        PointerWeighting::Proximity {
            reference_distance,
            exponent,
        } => Box::new(PointerProximity {
            reference_distance,
            exponent,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmodified_passthrough() {
        let p = Unmodified.modify(Transition::Conversion, 0.3, Position::new(1, 1), Point::default());
        assert_eq!(p, 0.3);
    }

    #[test]
    fn test_proximity_closeness() {
        let proximity = PointerProximity::default();
        let pointer = Point::new(0.0, 0.0);
        // At the reference distance closeness is exactly one
        assert!((proximity.closeness(Position::new(64, 0), pointer) - 1.0).abs() < 1e-12);
        assert!(proximity.closeness(Position::new(2, 0), pointer) > 1.0);
        assert!(proximity.closeness(Position::new(500, 0), pointer) < 1.0);
        // Pointer on top of the cell does not divide by zero
        assert!(proximity.closeness(Position::new(0, 0), pointer).is_finite());
    }

    #[test]
    fn test_proximity_clamps_and_ignores_death() {
        let proximity = PointerProximity::default();
        let pointer = Point::new(0.0, 0.0);
        let cell = Position::new(1, 0);
        assert_eq!(proximity.modify(Transition::Conversion, 1.0, cell, pointer), 1.0);
        assert_eq!(proximity.modify(Transition::Death, 0.4, cell, pointer), 0.4);
        assert_eq!(proximity.modify(Transition::Conversion, 0.0, cell, pointer), 0.0);
    }

    #[test]
    fn test_from_weighting() {
        let modifier = from_weighting(PointerWeighting::None);
        assert_eq!(
            modifier.modify(Transition::Conversion, 0.5, Position::new(100, 0), Point::default()),
            0.5
        );

        let modifier = from_weighting(PointerWeighting::proximity());
        assert!(modifier.modify(Transition::Conversion, 0.5, Position::new(500, 0), Point::default()) < 0.5);
    }
}
