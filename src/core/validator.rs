//! Disposition checks.
//!
//! [`is_disposition_valid`] only looks for cells claimed by two ships. It does
//! not care about grid bounds or about which ships make up the fleet;
//! [`check_fleet`] layers those rules on top and is what the engine enforces.

use std::collections::HashSet;

use crate::core::common::DispositionError;
use crate::core::config::{FLEET, NUM_SHIPS};
use crate::core::ship::ShipSpec;

/// Returns `false` as soon as a cell is claimed by a ship earlier in `ships`.
pub fn is_disposition_valid(ships: &[ShipSpec]) -> bool {
    let mut claimed = HashSet::new();
    for ship in ships {
        for cell in ship.cells() {
            if !claimed.insert(cell) {
                return false;
            }
        }
    }
    true
}

/// Strict check: exactly the canonical fleet, on the grid, without overlap.
pub fn check_fleet(ships: &[ShipSpec]) -> Result<(), DispositionError> {
    if ships.len() != NUM_SHIPS {
        return Err(DispositionError::WrongShipCount {
            expected: NUM_SHIPS,
            got: ships.len(),
        });
    }

    let mut sizes: Vec<u8> = ships.iter().map(|s| s.size).collect();
    let mut expected = FLEET.to_vec();
    sizes.sort_unstable();
    expected.sort_unstable();
    if sizes != expected {
        return Err(DispositionError::WrongFleet { sizes, expected });
    }

    if let Some(ship) = ships.iter().find(|s| !s.fits()) {
        return Err(DispositionError::OutOfBounds {
            position: ship.position,
            size: ship.size,
            vertical: ship.vertical,
        });
    }

    if !is_disposition_valid(ships) {
        return Err(DispositionError::Overlap);
    }
    Ok(())
}
