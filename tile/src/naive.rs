use crate::{TILE_BITS, Tile};

/// Rotate a tile clockwise one bit at a time.
///
/// This is the slowest possible schedule and exists as a reference for the real kernels.
#[must_use]
pub fn transpose_naive(tile: &Tile) -> Tile {
    let mut out = Tile::ZERO;
    for row in 0..TILE_BITS {
        for col in 0..TILE_BITS {
            out.set(col, TILE_BITS - 1 - row, tile.get(row, col));
        }
    }
    out
}
