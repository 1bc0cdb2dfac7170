//! Tile rotation as row rotations around a bit-plane exchange network.
//!
//! Rotating a tile clockwise sends logical bit `(row, col)` to `(col, 63 - row)`. The kernel
//! below factors that permutation into operations that act on whole rows at once:
//!
//! 1. rotate row `r` left by `r + 1`,
//! 2. rotate every column `c` down by `c + 1`,
//! 3. rotate row `r` left by `r`.
//!
//! Step 2 is the expensive one. A column rotation by `c` is the composition of one rotation per
//! set bit of `c`; the column rotations for bit `w` of every column happen simultaneously as a
//! single masked blend between row `r` and row `r - w`. Six such stages rotate column `c` by
//! `c`, and one extra global row shift supplies the `+ 1`.

use crate::{TILE_BITS, Tile, TileTranspose};

/// Word bits that stay in place during the exchange stage of width `width`.
///
/// Logical column `c` sits at word bit `63 - c`, so the bits of the word index are the
/// complement of the bits of the column index. A column moves down by `width` exactly when its
/// index has that bit set, that is, when the word bit index does not.
#[must_use]
pub const fn keep_mask(width: usize) -> u64 {
    let mut mask = 0;
    let mut bit = 0;
    while bit < TILE_BITS {
        if bit & width != 0 {
            mask |= 1 << bit;
        }
        bit += 1;
    }
    mask
}

/// `(row distance, keep mask)` for each exchange stage, widest first.
pub const STAGES: [(usize, u64); 6] = [
    (32, keep_mask(32)),
    (16, keep_mask(16)),
    (8, keep_mask(8)),
    (4, keep_mask(4)),
    (2, keep_mask(2)),
    (1, keep_mask(1)),
];

/// The row-rotate / bit-plane exchange kernel.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct ColumnRotate;

impl TileTranspose for ColumnRotate {
    #[inline]
    fn transpose(&self, tile: &Tile) -> Tile {
        let mut front = [0u64; TILE_BITS];
        let mut back = [0u64; TILE_BITS];

        for (r, (dst, src)) in front.iter_mut().zip(tile.rows()).enumerate() {
            *dst = src.rotate_left(((r + 1) % TILE_BITS) as u32);
        }

        // Each stage reads only `front` and writes every row of `back`.
        for (distance, keep) in STAGES {
            for (r, dst) in back.iter_mut().enumerate() {
                let from = (r + TILE_BITS - distance) % TILE_BITS;
                *dst = (front[r] & keep) | (front[from] & !keep);
            }
            core::mem::swap(&mut front, &mut back);
        }

        // The stages rotated column `c` by `c`; shifting every row down by one finishes the
        // column rotation before the closing row rotations.
        let mut out = [0u64; TILE_BITS];
        for (r, dst) in out.iter_mut().enumerate() {
            *dst = front[(r + TILE_BITS - 1) % TILE_BITS].rotate_left(r as u32);
        }
        Tile(out)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::transpose_naive;

    fn random_tile(rng: &mut SmallRng) -> Tile {
        let mut tile = Tile::ZERO;
        tile.rows_mut().iter_mut().for_each(|row| *row = rng.random());
        tile
    }

    #[test]
    fn keep_masks_match_bit_planes() {
        assert_eq!(keep_mask(32), 0xFFFF_FFFF_0000_0000);
        assert_eq!(keep_mask(16), 0xFFFF_0000_FFFF_0000);
        assert_eq!(keep_mask(8), 0xFF00_FF00_FF00_FF00);
        assert_eq!(keep_mask(4), 0xF0F0_F0F0_F0F0_F0F0);
        assert_eq!(keep_mask(2), 0xCCCC_CCCC_CCCC_CCCC);
        assert_eq!(keep_mask(1), 0xAAAA_AAAA_AAAA_AAAA);
    }

    #[test]
    fn satisfies_tile_law() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..16 {
            let input = random_tile(&mut rng);
            let output = ColumnRotate.transpose(&input);
            for r in 0..TILE_BITS {
                for c in 0..TILE_BITS {
                    assert_eq!(
                        output.get(r, c),
                        input.get(63 - c, r),
                        "mismatch at row {r}, column {c}"
                    );
                }
            }
        }
    }

    #[test]
    fn single_bits_move_to_their_rotated_position() {
        for row in 0..TILE_BITS {
            for col in 0..TILE_BITS {
                let mut input = Tile::ZERO;
                input.set(row, col, true);
                let output = ColumnRotate.transpose(&input);
                assert_eq!(output.count_ones(), 1);
                assert!(output.get(col, 63 - row));
            }
        }
    }

    #[test]
    fn agrees_with_naive() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            let input = random_tile(&mut rng);
            assert_eq!(ColumnRotate.transpose(&input), transpose_naive(&input));
        }
    }

    #[test]
    fn four_turns_are_the_identity() {
        let mut rng = SmallRng::seed_from_u64(11);
        let input = random_tile(&mut rng);
        let mut tile = input;
        for _ in 0..4 {
            ColumnRotate.transpose_in_place(&mut tile);
        }
        assert_eq!(tile, input);
    }

    #[test]
    fn row_index_fixture() {
        // Row r holds the value r, so the low six bits of each row encode its index.
        let input = Tile::from_rows(core::array::from_fn(|r| r as u64));
        let output = input.transpose();
        for r in 0..TILE_BITS {
            for c in 0..TILE_BITS {
                let source_row = 63 - c;
                let expected = r >= 58 && (source_row >> (63 - r)) & 1 == 1;
                assert_eq!(output.get(r, c), expected, "row {r}, column {c}");
            }
        }
    }
}
