//! Ship descriptors and placed ships tracked with a `BitBoard`.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::core::bitboard::{BitBoard, BitBoardError};
use crate::core::common::DispositionError;
use crate::core::config::{BOARD_SIZE, GRID_CELLS};

/// Bitboard sized for the game grid.
pub type Grid = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Distance in flat cell indices between two consecutive segments.
    pub fn step(self) -> i64 {
        match self {
            Orientation::Horizontal => 1,
            Orientation::Vertical => BOARD_SIZE as i64,
        }
    }
}

/// One ship as a participant describes it: anchor cell, size and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub position: i32,
    pub size: u8,
    pub vertical: bool,
}

impl ShipSpec {
    pub const fn new(position: i32, size: u8, vertical: bool) -> Self {
        Self {
            position,
            size,
            vertical,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Absolute cell indices covered by the ship. Not bounds checked.
    pub fn cells(&self) -> impl Iterator<Item = i64> {
        let anchor = i64::from(self.position);
        let step = self.orientation().step();
        (0..i64::from(self.size)).map(move |i| anchor + i * step)
    }

    /// Whether every segment lies on the grid without wrapping over a row edge.
    pub fn fits(&self) -> bool {
        if self.size == 0 || self.position < 0 || self.position as usize >= GRID_CELLS {
            return false;
        }
        let n = BOARD_SIZE as usize;
        let (row, col) = (self.position as usize / n, self.position as usize % n);
        let len = self.size as usize;
        match self.orientation() {
            Orientation::Horizontal => col + len <= n,
            Orientation::Vertical => row + len <= n,
        }
    }
}

/// A ship placed on the grid, with the hits it has taken.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    spec: ShipSpec,
    mask: Grid,
    hits: Grid,
}

impl Ship {
    /// Place a ship from its descriptor. Fails if it does not fit on the grid.
    pub fn place(spec: ShipSpec) -> Result<Self, DispositionError> {
        let out_of_bounds = || DispositionError::OutOfBounds {
            position: spec.position,
            size: spec.size,
            vertical: spec.vertical,
        };
        if !spec.fits() {
            return Err(out_of_bounds());
        }
        let mut mask = Grid::new();
        for cell in spec.cells() {
            let cell = usize::try_from(cell).map_err(|_| out_of_bounds())?;
            mask.set_index(cell).map_err(|_| out_of_bounds())?;
        }
        Ok(Ship {
            spec,
            mask,
            hits: Grid::new(),
        })
    }

    /// Whether the ship covers `index`.
    pub fn covers(&self, index: usize) -> bool {
        self.mask.get_index(index).unwrap_or(false)
    }

    /// Record a hit at `index`. Returns `true` if it landed on this ship.
    pub fn hit(&mut self, index: usize) -> Result<bool, BitBoardError> {
        if !self.covers(index) {
            return Ok(false);
        }
        self.hits.set_index(index)?;
        Ok(true)
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hits.count_ones() == self.spec.size as usize
    }

    /// Forget every hit taken so far.
    pub fn repair(&mut self) {
        self.hits.clear_all();
    }

    /// Occupancy mask of the ship on the board.
    pub fn mask(&self) -> Grid {
        self.mask
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ position: {}, size: {}, orientation: {:?}, hits: {} }}",
            self.spec.position,
            self.spec.size,
            self.spec.orientation(),
            self.hits.count_ones(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_orientation_step() {
        let across = ShipSpec::new(12, 3, false);
        assert_eq!(across.cells().collect::<Vec<_>>(), vec![12, 13, 14]);
        let down = ShipSpec::new(12, 3, true);
        assert_eq!(down.cells().collect::<Vec<_>>(), vec![12, 22, 32]);
    }

    #[test]
    fn ships_must_not_wrap_or_overflow() {
        assert!(ShipSpec::new(5, 5, false).fits());
        assert!(!ShipSpec::new(6, 5, false).fits());
        assert!(ShipSpec::new(50, 5, true).fits());
        assert!(!ShipSpec::new(60, 5, true).fits());
        assert!(!ShipSpec::new(-1, 2, false).fits());
        assert!(!ShipSpec::new(100, 2, false).fits());
        assert!(!ShipSpec::new(0, 0, false).fits());
    }

    #[test]
    fn placing_off_the_grid_fails() {
        assert_eq!(
            Ship::place(ShipSpec::new(98, 3, false)).unwrap_err(),
            DispositionError::OutOfBounds {
                position: 98,
                size: 3,
                vertical: false
            }
        );
    }

    #[test]
    fn ship_sinks_once_every_segment_is_hit() {
        let mut ship = Ship::place(ShipSpec::new(80, 2, false)).unwrap();
        assert_eq!(ship.hit(79), Ok(false));
        assert_eq!(ship.hit(80), Ok(true));
        assert!(!ship.is_sunk());
        assert_eq!(ship.hit(81), Ok(true));
        assert!(ship.is_sunk());
        ship.repair();
        assert!(!ship.is_sunk());
    }
}
