use alloc::vec;
use alloc::vec::Vec;

use bitspin_tile::{Tile, TileTranspose, load};
use rand::RngCore;

use crate::{RotateError, Rotator, Sweep, rotate_bit_matrix};

/// An owned square bit matrix in the packed layout the rotation works on.
///
/// Bit `(x, y)` (column `x`, row `y`) lives in byte `y * side / 8 + x / 8`, under the mask
/// `0x80 >> (x % 8)`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BitMatrix {
    side: usize,
    bytes: Vec<u8>,
}

impl BitMatrix {
    pub fn zeros(side: usize) -> Result<Self, RotateError> {
        let sweep = Sweep::new(side)?;
        Ok(Self {
            side,
            bytes: vec![0; sweep.byte_len()],
        })
    }

    /// Wrap an existing packed buffer.
    pub fn from_bytes(side: usize, bytes: Vec<u8>) -> Result<Self, RotateError> {
        Sweep::for_buffer(bytes.len(), side)?;
        Ok(Self { side, bytes })
    }

    pub fn random<R: RngCore + ?Sized>(rng: &mut R, side: usize) -> Result<Self, RotateError> {
        let mut matrix = Self::zeros(side)?;
        rng.fill_bytes(&mut matrix.bytes);
        Ok(matrix)
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[inline]
    const fn locate(&self, x: usize, y: usize) -> (usize, u8) {
        (y * (self.side / 8) + x / 8, 0x80 >> (x % 8))
    }

    /// # Panics
    /// Panics if `x` or `y` is not below `self.side()`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(x < self.side && y < self.side, "bit ({x}, {y}) out of range");
        let (byte, mask) = self.locate(x, y);
        self.bytes[byte] & mask != 0
    }

    /// # Panics
    /// Panics if `x` or `y` is not below `self.side()`.
    pub fn set(&mut self, x: usize, y: usize, bit: bool) {
        assert!(x < self.side && y < self.side, "bit ({x}, {y}) out of range");
        let (byte, mask) = self.locate(x, y);
        if bit {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }
    }

    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.bytes.iter().map(|b| u64::from(b.count_ones())).sum()
    }

    /// The tile whose top-left bit is column `i`, row `j`.
    #[must_use]
    pub fn tile(&self, i: usize, j: usize) -> Tile {
        load(&self.bytes, self.side / 64, i, j)
    }

    /// Rotate a quarter turn clockwise in place with the default rotator.
    pub fn rotate(&mut self) {
        rotate_bit_matrix(&mut self.bytes, self.side);
    }

    pub fn rotate_with<K: TileTranspose>(&mut self, rotator: &Rotator<K>) -> Result<(), RotateError> {
        rotator.rotate(&mut self.bytes, self.side)
    }

    /// A rotated copy built one bit at a time, for checking the tiled rotation.
    #[must_use]
    pub fn rotated_naive(&self) -> Self {
        let mut out = Self {
            side: self.side,
            bytes: vec![0; self.bytes.len()],
        };
        for y in 0..self.side {
            for x in 0..self.side {
                if self.get(x, y) {
                    out.set(self.side - 1 - y, x, true);
                }
            }
        }
        out
    }
}
