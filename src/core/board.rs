//! One participant's side of a match: fleet placement and shots taken.

use core::fmt;

use crate::core::common::{DispositionError, GameError, Tile};
use crate::core::config::GRID_CELLS;
use crate::core::ship::{Grid, Ship, ShipSpec};
use crate::core::validator::check_fleet;

/// Outcome of firing at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub tile: Tile,
    /// `false` when the cell had already been resolved and the shot changed nothing.
    pub fresh: bool,
}

pub struct Board {
    ships: Vec<Ship>,
    ship_map: Grid,
    outcomes: [Tile; GRID_CELLS],
}

impl Board {
    /// Validate and place a full fleet.
    pub fn new(specs: &[ShipSpec]) -> Result<Self, DispositionError> {
        check_fleet(specs)?;
        let ships = specs
            .iter()
            .map(|spec| Ship::place(*spec))
            .collect::<Result<Vec<_>, _>>()?;
        let ship_map = ships.iter().fold(Grid::new(), |map, s| map | s.mask());
        Ok(Board {
            ships,
            ship_map,
            outcomes: [Tile::Unknown; GRID_CELLS],
        })
    }

    /// Resolve a shot at `index`. Firing at a resolved cell returns the
    /// recorded tile and leaves the board untouched.
    pub fn fire(&mut self, index: usize) -> Result<Shot, GameError> {
        if index >= GRID_CELLS {
            return Err(GameError::PositionOutOfRange(index));
        }
        let recorded = self.outcomes[index];
        if recorded.is_resolved() {
            return Ok(Shot {
                tile: recorded,
                fresh: false,
            });
        }

        let tile = if self.ship_map.get_index(index)? {
            match self.ships.iter_mut().find(|s| s.covers(index)) {
                Some(ship) => {
                    ship.hit(index)?;
                    if ship.is_sunk() {
                        Tile::Sunk
                    } else {
                        Tile::Ship
                    }
                }
                None => Tile::Miss,
            }
        } else {
            Tile::Miss
        };
        self.outcomes[index] = tile;
        Ok(Shot { tile, fresh: true })
    }

    /// Returns `true` when all ships are sunk.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(Ship::is_sunk)
    }

    /// Recorded outcome at `index`, `Unknown` when off the grid.
    pub fn outcome(&self, index: usize) -> Tile {
        self.outcomes.get(index).copied().unwrap_or_default()
    }

    /// Keep the placement, forget every shot.
    pub fn clear_shots(&mut self) {
        self.ships.iter_mut().for_each(Ship::repair);
        self.outcomes = [Tile::Unknown; GRID_CELLS];
    }

    /// Number of ship cells not hit yet.
    pub fn remaining_cells(&self) -> usize {
        self.ship_map
            .iter_set_cells()
            .filter(|&i| !self.outcomes[i].is_resolved())
            .count()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  ships: {:?},\n  remaining: {}\n}}",
            self.ship_map,
            self.ships,
            self.remaining_cells()
        )
    }
}
