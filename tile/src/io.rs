//! Moving tiles between a packed matrix and local storage.
//!
//! The matrix is a byte buffer of `row_stride` 64-bit words per row, each word stored most
//! significant byte first. Tiles are addressed by the bit coordinates of their top-left corner:
//! `i` is the column and `j` the row, both multiples of 64.

use crate::{TILE_BITS, Tile, WORD_BYTES};

/// Byte offset of the first word of the tile at `(i, j)`.
#[must_use]
#[inline]
pub const fn tile_offset(row_stride: usize, i: usize, j: usize) -> usize {
    (j * row_stride + i / TILE_BITS) * WORD_BYTES
}

#[inline(always)]
fn word_at(matrix: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; WORD_BYTES];
    bytes.copy_from_slice(&matrix[at..at + WORD_BYTES]);
    u64::from_be_bytes(bytes)
}

/// Read the tile whose top-left bit is column `i`, row `j`.
///
/// # Panics
/// Panics if any row of the tile lies outside `matrix`. Misaligned `i` or `j` are not detected
/// in release builds.
#[must_use]
#[inline]
pub fn load(matrix: &[u8], row_stride: usize, i: usize, j: usize) -> Tile {
    debug_assert!(i % TILE_BITS == 0 && j % TILE_BITS == 0, "tile ({i}, {j}) is misaligned");
    let row_bytes = row_stride * WORD_BYTES;
    let start = tile_offset(row_stride, i, j);
    let mut tile = Tile::ZERO;
    for (y, word) in tile.0.iter_mut().enumerate() {
        *word = word_at(matrix, start + y * row_bytes);
    }
    tile
}

/// Write `tile` over the 64x64 region whose top-left bit is column `i`, row `j`.
///
/// # Panics
/// Panics if any row of the tile lies outside `matrix`.
#[inline]
pub fn store(matrix: &mut [u8], row_stride: usize, i: usize, j: usize, tile: &Tile) {
    debug_assert!(i % TILE_BITS == 0 && j % TILE_BITS == 0, "tile ({i}, {j}) is misaligned");
    let row_bytes = row_stride * WORD_BYTES;
    let start = tile_offset(row_stride, i, j);
    for (y, word) in tile.0.iter().enumerate() {
        let at = start + y * row_bytes;
        matrix[at..at + WORD_BYTES].copy_from_slice(&word.to_be_bytes());
    }
}

/// Pointer version of [`load`], for callers that share one buffer between workers.
///
/// # Safety
/// - All 64 rows of the tile must lie inside the allocation `matrix` points into.
/// - No other thread may write to this tile for the duration of the call.
#[must_use]
#[inline]
pub unsafe fn load_raw(matrix: *const u8, row_stride: usize, i: usize, j: usize) -> Tile {
    let row_bytes = row_stride * WORD_BYTES;
    let start = tile_offset(row_stride, i, j);
    let mut tile = Tile::ZERO;
    for (y, word) in tile.0.iter_mut().enumerate() {
        // SAFETY: the caller keeps every row of the tile inside the allocation, and `[u8; 8]`
        // has alignment 1.
        let bytes = unsafe {
            matrix
                .add(start + y * row_bytes)
                .cast::<[u8; WORD_BYTES]>()
                .read()
        };
        *word = u64::from_be_bytes(bytes);
    }
    tile
}

/// Pointer version of [`store`].
///
/// # Safety
/// - All 64 rows of the tile must lie inside the allocation `matrix` points into.
/// - No other thread may read or write this tile for the duration of the call.
#[inline]
pub unsafe fn store_raw(matrix: *mut u8, row_stride: usize, i: usize, j: usize, tile: &Tile) {
    let row_bytes = row_stride * WORD_BYTES;
    let start = tile_offset(row_stride, i, j);
    for (y, word) in tile.0.iter().enumerate() {
        // SAFETY: the caller keeps every row of the tile inside the allocation, and `[u8; 8]`
        // has alignment 1.
        unsafe {
            matrix
                .add(start + y * row_bytes)
                .cast::<[u8; WORD_BYTES]>()
                .write(word.to_be_bytes());
        }
    }
}
