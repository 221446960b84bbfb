//! Flat per-tick grid snapshot.

use serde::{Deserialize, Serialize};
use swarm_core::{Error, Faction, FactionCounts, Position, Result};

/// One tick's worth of cell factions, stored row-major (`i = x + y * width`).
///
/// Lookups outside the grid read as [`Faction::Error`] instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct GridState {
    width: i32,
    height: i32,
    cells: Vec<Faction>,
}

impl GridState {
    /// Create a grid with every cell `Empty`
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let size = checked_size(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Faction::Empty; size],
        })
    }

    /// Create a grid with the circular player region seeded around the center
    pub fn seeded(width: i32, height: i32, radius: f64) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        grid.reseed(radius);
        Ok(grid)
    }

    pub fn from_factions(width: i32, height: i32, cells: Vec<Faction>) -> Result<Self> {
        let expected = checked_size(width, height)?;
        if cells.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Overwrite every cell: `Player` where `dx² + dy² < radius²` from the
    /// integer center `(width / 2, height / 2)`, `Empty` elsewhere.
    pub fn reseed(&mut self, radius: f64) {
        let center = self.center();
        let radius_sq = radius * radius;
        let width = self.width;

        for (i, cell) in self.cells.iter_mut().enumerate() {
            let x = (i as i32) % width;
            let y = (i as i32) / width;
            let dx = (x - center.x) as f64;
            let dy = (y - center.y) as f64;
            *cell = if dx * dx + dy * dy < radius_sq {
                Faction::Player
            } else {
                Faction::Empty
            };
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Faction at position, `Error` when off-grid
    pub fn get(&self, pos: Position) -> Faction {
        match self.index_of(pos) {
            Some(index) => self.cells[index],
            None => Faction::Error,
        }
    }

    pub fn set(&mut self, pos: Position, faction: Faction) -> Result<()> {
        let index = self
            .index_of(pos)
            .ok_or(Error::OutOfBounds { x: pos.x, y: pos.y })?;
        self.cells[index] = faction;
        Ok(())
    }

    /// Flat read-only view for renderers
    pub fn factions(&self) -> &[Faction] {
        &self.cells
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Faction)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, faction)| (self.index_to_pos(i), *faction))
    }

    pub fn counts(&self) -> FactionCounts {
        self.cells.iter().copied().collect()
    }

    /// Same dimensions, every cell `Error` until written.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![Faction::Error; self.cells.len()],
        }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Faction] {
        &mut self.cells
    }
}

#[derive(Deserialize)]
struct RawGrid {
    width: i32,
    height: i32,
    cells: Vec<Faction>,
}

impl TryFrom<RawGrid> for GridState {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        GridState::from_factions(raw.width, raw.height, raw.cells)
    }
}

fn checked_size(width: i32, height: i32) -> Result<usize> {
    let invalid = || Error::InvalidDimensions {
        width: width as i64,
        height: height as i64,
    };
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }
    // Indices are computed in i32, so the cell count has to fit there too.
    width
        .checked_mul(height)
        .map(|size| size as usize)
        .ok_or_else(invalid)
}
