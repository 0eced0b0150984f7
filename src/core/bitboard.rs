//! A fixed-size bitboard implementation using const generics.
//!
//! Boards are an `N×N` grid packed into an unsigned integer `T`. Cells are
//! addressed either by `(row, col)` or by their flat index `row * N + col`,
//! which is how placements and shots travel on the wire.

use core::ops::BitOr;
use core::{any, fmt};
use num_traits::{PrimInt, Unsigned, Zero};
use thiserror::Error;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitBoardError {
    /// Row or column index is out of bounds [0..N).
    #[error("IndexOutOfBounds: row={row}, col={col}")]
    IndexOutOfBounds { row: usize, col: usize },
    /// Flat cell index is out of bounds [0..N*N).
    #[error("CellOutOfBounds: index={index}")]
    CellOutOfBounds { index: usize },
}

/// A fixed-size N×N bitboard stored in the unsigned integer `T`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitBoard<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    /// Number of usable bits in the board (`N * N`).
    pub const CELLS: usize = N * N;

    /// Create a new empty bitboard (all bits cleared) without size check.
    #[inline]
    pub fn new() -> Self {
        BitBoard { bits: T::zero() }
    }

    /// Returns the number of set bits (occupied cells).
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        if row >= N || col >= N {
            return Err(BitBoardError::IndexOutOfBounds { row, col });
        }
        self.get_index(row * N + col)
    }

    /// Sets the bit at (row, col) to 1.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        if row >= N || col >= N {
            return Err(BitBoardError::IndexOutOfBounds { row, col });
        }
        self.set_index(row * N + col)
    }

    /// Gets the bit at the flat cell `index`.
    pub fn get_index(&self, index: usize) -> Result<bool, BitBoardError> {
        Self::check_index(index)?;
        Ok(((self.bits >> index) & T::one()) != T::zero())
    }

    /// Sets the bit at the flat cell `index` to 1.
    pub fn set_index(&mut self, index: usize) -> Result<(), BitBoardError> {
        Self::check_index(index)?;
        self.bits = self.bits | (T::one() << index);
        Ok(())
    }

    /// Clears all bits to `0`.
    #[inline]
    pub fn clear_all(&mut self) {
        self.bits = T::zero();
    }

    #[inline]
    fn check_index(index: usize) -> Result<(), BitBoardError> {
        if index >= Self::CELLS {
            Err(BitBoardError::CellOutOfBounds { index })
        } else {
            Ok(())
        }
    }

    /// Iterator over the flat indices of set cells, in ascending order.
    pub fn iter_set_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..Self::CELLS).filter(move |&i| ((self.bits >> i) & T::one()) != T::zero())
    }
}

impl<T, const N: usize> Default for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero + fmt::Binary,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}, {}>:", any::type_name::<T>(), N)?;
        for r in 0..N {
            for c in 0..N {
                let bit = if ((self.bits >> (r * N + c)) & T::one()) != T::zero() {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T, const N: usize> BitOr for BitBoard<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        BitBoard {
            bits: self.bits | rhs.bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Grid = BitBoard<u128, 10>;

    #[test]
    fn index_and_coordinates_address_the_same_cell() {
        let mut grid = Grid::new();
        grid.set(3, 7).unwrap();
        assert!(grid.get_index(37).unwrap());
        grid.set_index(99).unwrap();
        assert!(grid.get(9, 9).unwrap());
        assert_eq!(grid.iter_set_cells().collect::<Vec<_>>(), vec![37, 99]);
    }

    #[test]
    fn out_of_range_cells_are_rejected() {
        let mut grid = Grid::new();
        assert_eq!(
            grid.set_index(100),
            Err(BitBoardError::CellOutOfBounds { index: 100 })
        );
        assert_eq!(
            grid.get(10, 0),
            Err(BitBoardError::IndexOutOfBounds { row: 10, col: 0 })
        );
        assert!(grid.is_empty());
    }
}
