use core::ops::{Index, IndexMut};

use crate::{ColumnRotate, TILE_BITS, TileTranspose};

/// A 64x64 block of bits, one word per row.
///
/// Columns are numbered from the most significant bit: column 0 of row `r` is
/// `self.0[r] >> 63`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct Tile(pub [u64; TILE_BITS]);

impl Default for Tile {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Tile {
    pub const ZERO: Self = Self([0; TILE_BITS]);

    #[must_use]
    pub const fn from_rows(rows: [u64; TILE_BITS]) -> Self {
        Self(rows)
    }

    /// A tile whose every row is `word`.
    #[must_use]
    pub const fn splat(word: u64) -> Self {
        Self([word; TILE_BITS])
    }

    #[must_use]
    pub const fn rows(&self) -> &[u64; TILE_BITS] {
        &self.0
    }

    pub const fn rows_mut(&mut self) -> &mut [u64; TILE_BITS] {
        &mut self.0
    }

    /// Read the bit at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row >= 64`. `col` is taken modulo 64.
    #[must_use]
    #[inline]
    pub const fn get(&self, row: usize, col: usize) -> bool {
        (self.0[row] >> (63 - (col & 63))) & 1 == 1
    }

    /// Write the bit at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row >= 64`. `col` is taken modulo 64.
    #[inline]
    pub const fn set(&mut self, row: usize, col: usize, bit: bool) {
        let mask = 1u64 << (63 - (col & 63));
        if bit {
            self.0[row] |= mask;
        } else {
            self.0[row] &= !mask;
        }
    }

    #[must_use]
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|row| row.count_ones()).sum()
    }

    /// The clockwise rotation of this tile, using the default [`ColumnRotate`] kernel.
    #[must_use]
    #[inline]
    pub fn transpose(&self) -> Self {
        ColumnRotate.transpose(self)
    }
}

impl Index<usize> for Tile {
    type Output = u64;

    #[inline]
    fn index(&self, row: usize) -> &u64 {
        &self.0[row]
    }
}

impl IndexMut<usize> for Tile {
    #[inline]
    fn index_mut(&mut self, row: usize) -> &mut u64 {
        &mut self.0[row]
    }
}
