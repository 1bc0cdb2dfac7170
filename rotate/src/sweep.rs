//! Which tiles a rotation visits, and in what order.
//!
//! A clockwise quarter turn of an `N x N` matrix sends the tile with top-left corner `(i, j)`
//! (column, row) to `(N - j - 64, i)`. Following that map four times returns to the start, so the
//! tiles split into 4-cycles, plus one fixed pivot tile when the tile grid has odd side length.
//!
//! Each 4-cycle has exactly one member in the sweep rectangle
//!
//! ```text
//! 0 <= h < N / 2,   0 <= w < w_bound
//! ```
//!
//! where `w_bound` is `N / 2` for an even tile grid and `(T - 1) * 32` for an odd one, which
//! leaves out the pivot column. Enumerating that rectangle therefore enumerates every cycle once.

use alloc::vec::Vec;
use core::ops::Range;

use bitspin_tile::TILE_BITS;
use itertools::iproduct;

use crate::{RotateError, Traversal};

/// The top-left bit coordinate of a tile: column `i`, row `j`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub i: usize,
    pub j: usize,
}

impl TilePos {
    #[must_use]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Where this tile lands after a clockwise quarter turn of a matrix of side `side`.
    #[must_use]
    #[inline]
    pub const fn rotated(self, side: usize) -> Self {
        Self {
            i: side - self.j - TILE_BITS,
            j: self.i,
        }
    }
}

/// A set of tile positions that a quarter turn permutes among themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orbit {
    /// The centre tile of an odd tile grid, which maps onto itself.
    Pivot(TilePos),
    /// `[a, b, c, d]` with each position the image of the one before it, and `a` the image of `d`.
    Cycle([TilePos; 4]),
}

impl Orbit {
    /// The cycle through `origin`.
    #[must_use]
    pub const fn cycle(side: usize, origin: TilePos) -> Self {
        let b = origin.rotated(side);
        let c = b.rotated(side);
        let d = c.rotated(side);
        Self::Cycle([origin, b, c, d])
    }

    #[must_use]
    pub const fn positions(&self) -> &[TilePos] {
        match self {
            Self::Pivot(pos) => core::slice::from_ref(pos),
            Self::Cycle(cycle) => cycle,
        }
    }
}

/// A rectangle of sweep origins processed together, in bit coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// Where to cut `range` so that the first half holds the larger share of its tiles.
fn split_point(range: &Range<usize>) -> usize {
    let tiles = range.len().div_ceil(TILE_BITS);
    (range.start + tiles.div_ceil(2) * TILE_BITS).min(range.end)
}

impl Block {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// The four quarters of this block: top-left, top-right, bottom-left, bottom-right.
    ///
    /// Blocks with a single tile row or column have empty quarters.
    #[must_use]
    pub fn quadrants(&self) -> [Self; 4] {
        let (top, bottom) = (self.rows.start, self.rows.end);
        let (left, right) = (self.cols.start, self.cols.end);
        let row_mid = split_point(&self.rows);
        let col_mid = split_point(&self.cols);
        [
            Self {
                rows: top..row_mid,
                cols: left..col_mid,
            },
            Self {
                rows: top..row_mid,
                cols: col_mid..right,
            },
            Self {
                rows: row_mid..bottom,
                cols: left..col_mid,
            },
            Self {
                rows: row_mid..bottom,
                cols: col_mid..right,
            },
        ]
    }

    /// One block per tile row of this block.
    pub fn strips(&self) -> impl Iterator<Item = Self> + use<> {
        let cols = self.cols.clone();
        let end = self.rows.end;
        self.rows
            .clone()
            .step_by(TILE_BITS)
            .map(move |j| Self {
                rows: j..(j + TILE_BITS).min(end),
                cols: cols.clone(),
            })
            .filter(|strip| !strip.is_empty())
    }

    /// Tile origins inside this block, row by row.
    pub fn row_major_origins(&self) -> impl Iterator<Item = TilePos> + use<> {
        iproduct!(
            self.rows.clone().step_by(TILE_BITS),
            self.cols.clone().step_by(TILE_BITS)
        )
        .map(|(j, i)| TilePos::new(i, j))
    }

    /// Tile origins inside this block, one quadrant at a time, each quadrant row by row.
    ///
    /// For a block one tile high this is plain left-to-right order.
    pub fn origins(&self) -> impl Iterator<Item = TilePos> + use<> {
        self.quadrants()
            .into_iter()
            .flat_map(|quadrant| quadrant.row_major_origins())
    }
}

/// The geometry of one rotation: matrix side, tile grid, pivot and sweep rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sweep {
    side: usize,
    h_bound: usize,
    w_bound: usize,
    pivot: Option<TilePos>,
}

impl Sweep {
    /// Check that `side` is a usable matrix side and lay out its sweep.
    pub const fn new(side: usize) -> Result<Self, RotateError> {
        if side == 0 {
            return Err(RotateError::ZeroSide);
        }
        if side % TILE_BITS != 0 {
            return Err(RotateError::SideNotMultipleOf64 { side });
        }
        if side.checked_mul(side).is_none() {
            return Err(RotateError::SideTooLarge { side });
        }

        let tiles = side / TILE_BITS;
        let h_bound = side / 2;
        let (w_bound, pivot) = if tiles % 2 == 0 {
            (side / 2, None)
        } else {
            let centre = (tiles - 1) * (TILE_BITS / 2);
            (centre, Some(TilePos::new(centre, centre)))
        };

        Ok(Self {
            side,
            h_bound,
            w_bound,
            pivot,
        })
    }

    /// Like [`Sweep::new`], additionally checking that `len` bytes hold exactly one matrix.
    pub const fn for_buffer(len: usize, side: usize) -> Result<Self, RotateError> {
        let sweep = match Self::new(side) {
            Ok(sweep) => sweep,
            Err(err) => return Err(err),
        };
        let expected = sweep.byte_len();
        if len != expected {
            return Err(RotateError::BufferLength {
                side,
                expected,
                actual: len,
            });
        }
        Ok(sweep)
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Number of 64-bit words per matrix row.
    #[must_use]
    pub const fn row_stride(&self) -> usize {
        self.side / TILE_BITS
    }

    #[must_use]
    pub const fn tiles_per_side(&self) -> usize {
        self.side / TILE_BITS
    }

    /// Size of the packed matrix in bytes.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.side * (self.side / 8)
    }

    #[must_use]
    pub const fn pivot(&self) -> Option<TilePos> {
        self.pivot
    }

    /// Number of 4-cycles in the sweep.
    #[must_use]
    pub const fn cycle_count(&self) -> usize {
        (self.h_bound.div_ceil(TILE_BITS)) * (self.w_bound / TILE_BITS)
    }

    /// Height and width, in bits, of the blocks `traversal` cuts the sweep into.
    const fn block_shape(&self, traversal: Traversal) -> (usize, usize) {
        match traversal {
            Traversal::RowMajor => {
                let width = if self.w_bound > TILE_BITS {
                    self.w_bound
                } else {
                    TILE_BITS
                };
                (TILE_BITS, width)
            }
            Traversal::SuperBlock { tiles } => {
                // Zero is rejected by `Traversal::validate`; treat it as one tile here.
                let tiles = if tiles == 0 { 1 } else { tiles };
                let span = tiles.saturating_mul(TILE_BITS);
                (span, span)
            }
        }
    }

    /// Block rows and block columns of the sweep under `traversal`.
    const fn block_grid(&self, traversal: Traversal) -> (usize, usize) {
        let (height, width) = self.block_shape(traversal);
        (
            self.h_bound.div_ceil(height),
            self.w_bound.div_ceil(width),
        )
    }

    #[must_use]
    pub const fn block_count(&self, traversal: Traversal) -> usize {
        let (rows, cols) = self.block_grid(traversal);
        rows * cols
    }

    /// The `index`-th block of the sweep, counting blocks row by row.
    ///
    /// # Panics
    /// Panics if `index >= self.block_count(traversal)`.
    #[must_use]
    pub fn block(&self, traversal: Traversal, index: usize) -> Block {
        let (height, width) = self.block_shape(traversal);
        let (rows, cols) = self.block_grid(traversal);
        assert!(index < rows * cols, "block {index} out of range");
        let (row, col) = (index / cols, index % cols);
        Block {
            rows: row * height..((row + 1) * height).min(self.h_bound),
            cols: col * width..((col + 1) * width).min(self.w_bound),
        }
    }

    pub fn blocks(&self, traversal: Traversal) -> impl Iterator<Item = Block> + '_ {
        (0..self.block_count(traversal)).map(move |index| self.block(traversal, index))
    }

    /// The blocks of `traversal` cut into quadrants and then into tile rows.
    ///
    /// These are the units the parallel sweep distributes. Concatenated they visit the origins in
    /// the same order as [`Sweep::origins`].
    #[must_use]
    pub fn work_units(&self, traversal: Traversal) -> Vec<Block> {
        self.blocks(traversal)
            .flat_map(|block| block.quadrants())
            .flat_map(|quadrant| quadrant.strips())
            .collect()
    }

    /// Every sweep origin, in the order `traversal` visits them.
    pub fn origins(&self, traversal: Traversal) -> impl Iterator<Item = TilePos> + '_ {
        self.blocks(traversal).flat_map(|block| block.origins())
    }

    /// Every orbit of the rotation: the pivot first, if there is one, then each 4-cycle.
    pub fn orbits(&self, traversal: Traversal) -> impl Iterator<Item = Orbit> + '_ {
        self.pivot
            .map(Orbit::Pivot)
            .into_iter()
            .chain(
                self.origins(traversal)
                    .map(|origin| Orbit::cycle(self.side, origin)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_follows_the_tile_map() {
        let side = 256;
        let a = TilePos::new(64, 0);
        assert_eq!(a.rotated(side), TilePos::new(192, 64));
        let mut pos = a;
        for _ in 0..4 {
            pos = pos.rotated(side);
        }
        assert_eq!(pos, a);
    }

    #[test]
    fn cycle_matches_closed_forms() {
        let side = 512;
        let (w, h) = (128, 64);
        let Orbit::Cycle(cycle) = Orbit::cycle(side, TilePos::new(w, h)) else {
            panic!("expected a 4-cycle");
        };
        assert_eq!(
            cycle,
            [
                TilePos::new(w, h),
                TilePos::new(side - h - 64, w),
                TilePos::new(side - w - 64, side - h - 64),
                TilePos::new(h, side - w - 64),
            ]
        );
    }

    #[test]
    fn pivot_only_for_odd_grids() {
        assert_eq!(Sweep::new(128).unwrap().pivot(), None);
        assert_eq!(
            Sweep::new(192).unwrap().pivot(),
            Some(TilePos::new(64, 64))
        );
        assert_eq!(Sweep::new(64).unwrap().pivot(), Some(TilePos::new(0, 0)));
        assert_eq!(Sweep::new(64).unwrap().cycle_count(), 0);
    }

    #[test]
    fn validates_side() {
        assert_eq!(Sweep::new(0), Err(RotateError::ZeroSide));
        assert_eq!(
            Sweep::new(100),
            Err(RotateError::SideNotMultipleOf64 { side: 100 })
        );
        assert!(matches!(
            Sweep::new(usize::MAX - 63),
            Err(RotateError::SideTooLarge { .. })
        ));
        assert_eq!(
            Sweep::for_buffer(10, 64),
            Err(RotateError::BufferLength {
                side: 64,
                expected: 512,
                actual: 10
            })
        );
    }

    #[test]
    fn every_tile_belongs_to_exactly_one_orbit() {
        let traversals = [
            Traversal::RowMajor,
            Traversal::SuperBlock { tiles: 1 },
            Traversal::SuperBlock { tiles: 2 },
            Traversal::SuperBlock { tiles: 3 },
            Traversal::SuperBlock { tiles: 100 },
        ];
        for tiles in 1..=9 {
            let side = tiles * TILE_BITS;
            let sweep = Sweep::new(side).unwrap();
            for traversal in traversals {
                let mut seen: Vec<TilePos> = sweep
                    .orbits(traversal)
                    .flat_map(|orbit| orbit.positions().to_vec())
                    .collect();
                let visited = seen.len();
                seen.sort();
                seen.dedup();
                assert_eq!(visited, tiles * tiles, "side {side}, {traversal:?}");
                assert_eq!(seen.len(), tiles * tiles, "side {side}, {traversal:?}");
                assert_eq!(
                    sweep.orbits(traversal).count() - usize::from(sweep.pivot().is_some()),
                    sweep.cycle_count()
                );
            }
        }
    }

    #[test]
    fn traversals_reorder_the_same_cycles() {
        let sweep = Sweep::new(20 * TILE_BITS).unwrap();
        let mut row_major: Vec<TilePos> = sweep.origins(Traversal::RowMajor).collect();
        let mut blocked: Vec<TilePos> = sweep
            .origins(Traversal::SuperBlock { tiles: 3 })
            .collect();
        assert_ne!(row_major, blocked);
        row_major.sort();
        blocked.sort();
        assert_eq!(row_major, blocked);
    }

    #[test]
    fn super_blocks_are_clipped_to_the_sweep() {
        let sweep = Sweep::new(10 * TILE_BITS).unwrap();
        let traversal = Traversal::SuperBlock { tiles: 3 };
        // The sweep is 5x5 tiles, so a 3-tile grid has 2x2 blocks.
        assert_eq!(sweep.block_count(traversal), 4);
        let last = sweep.block(traversal, 3);
        assert_eq!(last.rows, 192..320);
        assert_eq!(last.cols, 192..320);
        assert_eq!(last.origins().count(), 4);
    }

    #[test]
    fn super_blocks_are_visited_quadrant_by_quadrant() {
        let sweep = Sweep::new(8 * TILE_BITS).unwrap();
        let block = sweep.block(Traversal::SuperBlock { tiles: 4 }, 0);
        let origins: Vec<(usize, usize)> = block
            .origins()
            .map(|pos| (pos.i / TILE_BITS, pos.j / TILE_BITS))
            .collect();
        assert_eq!(
            origins,
            [
                (0, 0), (1, 0), (0, 1), (1, 1),
                (2, 0), (3, 0), (2, 1), (3, 1),
                (0, 2), (1, 2), (0, 3), (1, 3),
                (2, 2), (3, 2), (2, 3), (3, 3),
            ]
        );
    }

    #[test]
    fn single_row_blocks_keep_row_order() {
        let sweep = Sweep::new(12 * TILE_BITS).unwrap();
        let block = sweep.block(Traversal::RowMajor, 2);
        assert!(block.origins().eq(block.row_major_origins()));
        assert_eq!(block.quadrants()[2].origins().count(), 0);
    }

    #[test]
    fn work_units_follow_the_sweep_order() {
        for tiles in [3, 8, 11] {
            let sweep = Sweep::new(tiles * TILE_BITS).unwrap();
            for traversal in [
                Traversal::RowMajor,
                Traversal::SuperBlock { tiles: 2 },
                Traversal::SuperBlock { tiles: 100 },
            ] {
                let units = sweep.work_units(traversal);
                assert!(units.iter().all(|unit| unit.rows.len() <= TILE_BITS));
                assert!(
                    units
                        .iter()
                        .flat_map(Block::origins)
                        .eq(sweep.origins(traversal)),
                    "side {}, {traversal:?}",
                    sweep.side()
                );
            }
        }
    }

    #[test]
    fn default_traversal_splits_into_many_work_units() {
        let sweep = Sweep::new(8192).unwrap();
        let traversal = Traversal::default();
        assert_eq!(sweep.tiles_per_side(), 128);
        // The whole 64x64-tile sweep fits in one 100-tile super-block.
        assert_eq!(sweep.block_count(traversal), 1);
        let units = sweep.work_units(traversal);
        assert_eq!(units.len(), 4 * 32);
        assert_eq!(
            units.iter().map(|unit| unit.origins().count()).sum::<usize>(),
            sweep.cycle_count()
        );
    }
}
