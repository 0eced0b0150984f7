pub const BOARD_SIZE: u8 = 10;
pub const GRID_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;
pub const NUM_SHIPS: usize = 5;

/// Ship sizes of the canonical fleet.
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
pub const FLEET: [u8; NUM_SHIPS] = [5, 4, 3, 3, 2];

