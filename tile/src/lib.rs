//! The 64x64 bit tile: the unit every rotation in this workspace is built from.
//!
//! A [`Tile`] holds 64 rows of a packed bit matrix, one `u64` per row, with bit 63 of each
//! word being the tile's logical column 0. Matrices store their rows most-significant byte
//! first, so [`load`] and [`store`] byte-swap on little-endian hosts.
//!
//! The tile kernels implement [`TileTranspose`], which turns a tile a quarter turn clockwise:
//!
//! ```text
//! out[r] column c  ==  in[63 - c] column r
//! ```

#![no_std]

mod delta_swap;
mod io;
mod naive;
mod network;
mod tile;

pub use delta_swap::DeltaSwap;
pub use io::{load, load_raw, store, store_raw, tile_offset};
pub use naive::transpose_naive;
pub use network::{ColumnRotate, STAGES, keep_mask};
pub use tile::Tile;

/// Side length of a tile, in bits.
pub const TILE_BITS: usize = 64;

/// Number of bytes in one row word of a tile.
pub const WORD_BYTES: usize = core::mem::size_of::<u64>();

/// Number of bytes a tile occupies once materialized.
pub const TILE_BYTES: usize = TILE_BITS * WORD_BYTES;

/// A kernel that rotates a single tile 90 degrees clockwise.
///
/// All implementations must agree bit for bit; they differ only in how the bit
/// permutation is scheduled.
pub trait TileTranspose: Copy + Default + Send + Sync + core::fmt::Debug {
    /// Return the clockwise rotation of `tile`.
    fn transpose(&self, tile: &Tile) -> Tile;

    /// Rotate `tile` in place.
    #[inline]
    fn transpose_in_place(&self, tile: &mut Tile) {
        *tile = self.transpose(tile);
    }
}
