use bitspin_tile::{ColumnRotate, Tile, TileTranspose, load, load_raw, store, store_raw};
use tracing::{debug, instrument, trace};

use crate::{Orbit, RotateConfig, RotateError, Sweep, TilePos};

/// Somewhere tiles can be read from and written back to.
trait TileAccess {
    fn load(&self, pos: TilePos) -> Tile;
    fn store(&mut self, pos: TilePos, tile: &Tile);
}

/// Exclusive access through a slice; used by the serial sweep.
struct SliceTiles<'a> {
    matrix: &'a mut [u8],
    row_stride: usize,
}

impl TileAccess for SliceTiles<'_> {
    #[inline]
    fn load(&self, pos: TilePos) -> Tile {
        load(self.matrix, self.row_stride, pos.i, pos.j)
    }

    #[inline]
    fn store(&mut self, pos: TilePos, tile: &Tile) {
        store(self.matrix, self.row_stride, pos.i, pos.j, tile);
    }
}

/// Shared access through a raw pointer; used by the parallel sweep, where each worker owns a
/// disjoint set of orbits.
///
/// Every position passed in must lie inside the validated matrix `base` points to.
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
struct RawTiles {
    base: *mut u8,
    row_stride: usize,
}

impl TileAccess for RawTiles {
    #[inline]
    fn load(&self, pos: TilePos) -> Tile {
        // SAFETY: `pos` is a tile of the validated matrix behind `base`, and its orbit belongs to
        // this worker alone.
        unsafe { load_raw(self.base, self.row_stride, pos.i, pos.j) }
    }

    #[inline]
    fn store(&mut self, pos: TilePos, tile: &Tile) {
        // SAFETY: as in `load`; no other worker reads or writes this tile.
        unsafe { store_raw(self.base, self.row_stride, pos.i, pos.j, tile) }
    }
}

/// Rotate every tile of `orbit` and move it to its destination.
///
/// A 4-cycle carries one tile around the loop: each destination is read before the incoming
/// tile overwrites it, and the tile read last is written to the start of the cycle.
#[inline]
fn rotate_orbit<K: TileTranspose, A: TileAccess>(kernel: &K, tiles: &mut A, orbit: &Orbit) {
    match *orbit {
        Orbit::Pivot(pos) => {
            let tile = tiles.load(pos);
            tiles.store(pos, &kernel.transpose(&tile));
        }
        Orbit::Cycle([a, b, c, d]) => {
            let mut carried = tiles.load(a);
            for dst in [b, c, d] {
                let evicted = tiles.load(dst);
                tiles.store(dst, &kernel.transpose(&carried));
                carried = evicted;
            }
            tiles.store(a, &kernel.transpose(&carried));
        }
    }
}

/// Rotates packed bit matrices a quarter turn clockwise, in place.
///
/// `K` is the kernel used on each 64x64 tile; all kernels produce identical results.
#[derive(Copy, Clone, Debug, Default)]
pub struct Rotator<K = ColumnRotate> {
    kernel: K,
    config: RotateConfig,
}

impl<K: TileTranspose> Rotator<K> {
    #[must_use]
    pub const fn new(kernel: K, config: RotateConfig) -> Self {
        Self { kernel, config }
    }

    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    #[must_use]
    pub const fn config(&self) -> &RotateConfig {
        &self.config
    }

    /// Rotate the `side x side` matrix packed into `matrix`.
    ///
    /// All checks happen before any tile moves: on error the buffer is untouched.
    #[instrument(
        level = "debug",
        skip_all,
        fields(side = side, traversal = ?self.config.traversal, parallel = self.config.parallel)
    )]
    pub fn rotate(&self, matrix: &mut [u8], side: usize) -> Result<(), RotateError> {
        self.config.validate()?;
        let sweep = Sweep::for_buffer(matrix.len(), side)?;

        debug!(
            tiles = sweep.tiles_per_side(),
            cycles = sweep.cycle_count(),
            blocks = sweep.block_count(self.config.traversal),
            pivot = sweep.pivot().is_some(),
            "rotating bit matrix"
        );

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            self.rotate_parallel(matrix, &sweep);
            return Ok(());
        }

        self.rotate_serial(matrix, &sweep);
        Ok(())
    }

    fn rotate_serial(&self, matrix: &mut [u8], sweep: &Sweep) {
        let traversal = self.config.traversal;
        let mut tiles = SliceTiles {
            matrix,
            row_stride: sweep.row_stride(),
        };

        if let Some(pivot) = sweep.pivot() {
            debug!(i = pivot.i, j = pivot.j, "rotating pivot tile in place");
            rotate_orbit(&self.kernel, &mut tiles, &Orbit::Pivot(pivot));
        }

        for (index, block) in sweep.blocks(traversal).enumerate() {
            trace!(index, rows = ?block.rows, cols = ?block.cols, "block");
            for origin in block.origins() {
                rotate_orbit(
                    &self.kernel,
                    &mut tiles,
                    &Orbit::cycle(sweep.side(), origin),
                );
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn rotate_parallel(&self, matrix: &mut [u8], sweep: &Sweep) {
        use rayon::prelude::*;

        let traversal = self.config.traversal;
        let row_stride = sweep.row_stride();

        if let Some(pivot) = sweep.pivot() {
            debug!(i = pivot.i, j = pivot.j, "rotating pivot tile in place");
            let mut tiles = SliceTiles {
                matrix: &mut *matrix,
                row_stride,
            };
            rotate_orbit(&self.kernel, &mut tiles, &Orbit::Pivot(pivot));
        }

        let units = sweep.work_units(traversal);
        debug!(work_units = units.len(), "spreading sweep over rayon");
        let base = matrix.as_mut_ptr() as usize;

        // SAFETY: `Sweep::for_buffer` checked that every tile position lies inside `matrix`.
        // The work units hold disjoint sets of sweep origins and every 4-cycle is reached from
        // exactly one origin, so no tile is touched by two workers, and the pivot was finished
        // before the workers start.
        units.par_iter().for_each(|unit| {
            let mut tiles = RawTiles {
                base: base as *mut u8,
                row_stride,
            };
            for origin in unit.origins() {
                rotate_orbit(
                    &self.kernel,
                    &mut tiles,
                    &Orbit::cycle(sweep.side(), origin),
                );
            }
        });
    }
}
