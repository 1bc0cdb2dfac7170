//! In-place quarter-turn rotation of packed square bit matrices.
//!
//! A matrix of side `N` (a positive multiple of 64) is stored row-major, `N / 8` bytes per row,
//! most significant bit first. [`rotate_bit_matrix`] turns it 90 degrees clockwise without an
//! output buffer: the matrix is cut into 64x64 tiles, each tile is rotated in registers by a
//! [`TileTranspose`] kernel, and whole tiles are moved around their 4-cycles with one spare tile
//! in hand.

#![no_std]

extern crate alloc;

mod bit_matrix;
mod config;
mod error;
mod rotator;
mod sweep;

pub use bit_matrix::BitMatrix;
pub use bitspin_tile::{ColumnRotate, DeltaSwap, Tile, TileTranspose};
pub use config::{DEFAULT_SUPER_BLOCK_TILES, RotateConfig, Traversal};
pub use error::RotateError;
pub use rotator::Rotator;
pub use sweep::{Block, Orbit, Sweep, TilePos};

/// Rotate the `side x side` bit matrix in `matrix` 90 degrees clockwise, in place.
///
/// # Panics
/// Panics if `side` is zero or not a multiple of 64, or if `matrix` is not exactly
/// `side * side / 8` bytes long. Nothing is modified in that case.
pub fn rotate_bit_matrix(matrix: &mut [u8], side: usize) {
    if let Err(err) = try_rotate_bit_matrix(matrix, side) {
        panic!("cannot rotate bit matrix: {err}");
    }
}

/// Like [`rotate_bit_matrix`], but reports invalid input instead of panicking.
pub fn try_rotate_bit_matrix(matrix: &mut [u8], side: usize) -> Result<(), RotateError> {
    Rotator::<ColumnRotate>::default().rotate(matrix, side)
}
