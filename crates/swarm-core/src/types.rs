//! Core type definitions for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete state label of a single grid cell.
///
/// Discriminants double as palette indices for renderers. Only `Error`,
/// `Empty` and `Player` are produced by the transition rule; the reserved
/// slots exist so future factions keep stable palette positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Faction {
    Error = 0,
    #[default]
    Empty = 1,
    Player = 2,
    Reserved3 = 3,
    Reserved4 = 4,
    Reserved5 = 5,
    Reserved6 = 6,
    Reserved7 = 7,
}

impl Faction {
    /// Number of palette slots a renderer must provide.
    pub const PALETTE_SIZE: usize = 8;

    pub const ALL: [Faction; Faction::PALETTE_SIZE] = [
        Faction::Error,
        Faction::Empty,
        Faction::Player,
        Faction::Reserved3,
        Faction::Reserved4,
        Faction::Reserved5,
        Faction::Reserved6,
        Faction::Reserved7,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// True for every faction except the void/error state.
    pub fn is_present(self) -> bool {
        self != Faction::Error
    }

    pub fn is_player(self) -> bool {
        self == Faction::Player
    }
}

impl TryFrom<u8> for Faction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Faction::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidFaction(value))
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Faction::Error => "error",
            Faction::Empty => "empty",
            Faction::Player => "player",
            Faction::Reserved3 => "reserved3",
            Faction::Reserved4 => "reserved4",
            Faction::Reserved5 => "reserved5",
            Faction::Reserved6 => "reserved6",
            Faction::Reserved7 => "reserved7",
        };
        f.write_str(name)
    }
}

/// Integer cell coordinate. May point outside the grid while sampling neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Saturates at the `i32` limits, which lie off any grid.
    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }
}

/// Pointer ("mouse") position in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to the given cell
    pub fn distance_to(&self, pos: Position) -> f64 {
        let dx = self.x - pos.x as f64;
        let dy = self.y - pos.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The eight neighbor directions of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    West,
    South,
    East,
    NorthWest,
    SouthWest,
    SouthEast,
    NorthEast,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (1, 1),
            Direction::NorthEast => (1, -1),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Direction::NorthWest | Direction::SouthWest | Direction::SouthEast | Direction::NorthEast
        )
    }

    /// Contribution of a neighbor in this direction to the neighbor weight
    pub fn weight(&self) -> f64 {
        if self.is_diagonal() {
            0.5
        } else {
            1.0
        }
    }

    /// Orthogonal directions first, then diagonals.
    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::West,
            Direction::South,
            Direction::East,
            Direction::NorthWest,
            Direction::SouthWest,
            Direction::SouthEast,
            Direction::NorthEast,
        ]
    }
}

/// Upper bound of any neighbor weight sum: 4 x 1.0 + 4 x 0.5
pub const MAX_NEIGHBOR_WEIGHT: f64 = 6.0;

/// Number of cells per faction in a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactionCounts {
    counts: [u64; Faction::PALETTE_SIZE],
}

impl FactionCounts {
    pub fn record(&mut self, faction: Faction) {
        self.counts[faction.index() as usize] += 1;
    }

    pub fn get(&self, faction: Faction) -> u64 {
        self.counts[faction.index() as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fraction of cells owned by the player, 0.0 for an empty tally
    pub fn player_share(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(Faction::Player) as f64 / total as f64
        }
    }
}

impl FromIterator<Faction> for FactionCounts {
    fn from_iter<I: IntoIterator<Item = Faction>>(iter: I) -> Self {
        let mut counts = Self::default();
        for faction in iter {
            counts.record(faction);
        }
        counts
    }
}
