//! Placement policies used by clients to produce their fleet.
//!
//! The server never chooses placements; it only validates them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::core::{is_disposition_valid, ShipSpec, BOARD_SIZE, FLEET};

/// Produces the positions occupied by a participant's ships.
///
/// A disposition is the five ships of the canonical fleet:
///
/// ```text
///             Ship | Size
/// -----------------|------
/// Aircraft carrier |   5
///       Battleship |   4
///        Submarine |   3
///        Destroyer |   3
///      Patrol boat |   2
/// ```
pub trait Disposer: Send {
    fn dispose(&mut self) -> Vec<ShipSpec>;
}

/// Every ship along the left edge of an even row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDisposer;

impl Disposer for FixedDisposer {
    fn dispose(&mut self) -> Vec<ShipSpec> {
        FLEET
            .iter()
            .enumerate()
            .map(|(i, &size)| ShipSpec::new((i * 2 * BOARD_SIZE as usize) as i32, size, false))
            .collect()
    }
}

/// Random non-overlapping placement that always stays on the grid.
pub struct RandomDisposer<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDisposer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Random anchor and orientation for a ship of `size` that fits the grid.
    fn candidate(&mut self, size: u8) -> ShipSpec {
        let n = BOARD_SIZE as usize;
        let len = size as usize;
        let vertical: bool = self.rng.random();
        let (max_r, max_c) = if vertical {
            (n - len, n - 1)
        } else {
            (n - 1, n - len)
        };
        let r = self.rng.random_range(0..=max_r);
        let c = self.rng.random_range(0..=max_c);
        ShipSpec::new((r * n + c) as i32, size, vertical)
    }
}

impl RandomDisposer<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Disposer for RandomDisposer<R> {
    fn dispose(&mut self) -> Vec<ShipSpec> {
        // Restart from scratch when a ship finds no room after a bounded
        // number of attempts; the canonical fleet leaves plenty of room.
        loop {
            let mut ships: Vec<ShipSpec> = Vec::with_capacity(FLEET.len());
            for &size in FLEET.iter() {
                for _ in 0..100 {
                    let candidate = self.candidate(size);
                    ships.push(candidate);
                    if is_disposition_valid(&ships) {
                        break;
                    }
                    ships.pop();
                }
            }
            if ships.len() == FLEET.len() {
                return ships;
            }
        }
    }
}

/// Look up a disposer by the name used on the command line.
pub fn disposer_by_name(name: &str, seed: Option<u64>) -> Option<Box<dyn Disposer>> {
    match name {
        "random" => {
            let rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            Some(Box::new(RandomDisposer::new(rng)))
        }
        "fixed" => Some(Box::new(FixedDisposer)),
        _ => None,
    }
}
