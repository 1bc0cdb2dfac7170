use crate::{TILE_BITS, Tile, TileTranspose, keep_mask};

/// Swap the off-diagonal `WIDTH x WIDTH` blocks of every `2 * WIDTH` square along the diagonal.
///
/// `MASK` selects the low `WIDTH` bits of every `2 * WIDTH` bit group of a word.
#[inline(always)]
fn swap_blocks<const WIDTH: usize, const MASK: u64>(rows: &mut [u64; TILE_BITS]) {
    for top in (0..TILE_BITS).step_by(2 * WIDTH) {
        for offset in 0..WIDTH {
            let upper = top + offset;
            let lower = upper + WIDTH;
            let delta = ((rows[upper] >> WIDTH) ^ rows[lower]) & MASK;
            rows[lower] ^= delta;
            rows[upper] ^= delta << WIDTH;
        }
    }
}

/// Block-swap kernel: a full bit-matrix transpose followed by a reversal of the row order.
///
/// The transpose is the recursive block swap from Hacker's Delight (7-3), run bottom up over
/// 1x1, 2x2, ..., 32x32 blocks. With column 0 at the top bit of each word, transposing by word
/// bit index and then reversing the rows yields the clockwise rotation.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct DeltaSwap;

impl TileTranspose for DeltaSwap {
    #[inline]
    fn transpose(&self, tile: &Tile) -> Tile {
        let mut rows = tile.0;
        swap_blocks::<1, { !keep_mask(1) }>(&mut rows);
        swap_blocks::<2, { !keep_mask(2) }>(&mut rows);
        swap_blocks::<4, { !keep_mask(4) }>(&mut rows);
        swap_blocks::<8, { !keep_mask(8) }>(&mut rows);
        swap_blocks::<16, { !keep_mask(16) }>(&mut rows);
        swap_blocks::<32, { !keep_mask(32) }>(&mut rows);
        rows.reverse();
        Tile(rows)
    }
}
