use serde::{Deserialize, Serialize};

use crate::RotateError;

/// Super-block side, in tiles, used when nothing else is configured.
pub const DEFAULT_SUPER_BLOCK_TILES: usize = 100;

/// The order in which the sweep visits its 4-cycles.
///
/// Every traversal visits the same cycles exactly once, so the rotated matrix does not depend
/// on this choice; only the memory access pattern does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    /// One row of tiles at a time, left to right.
    RowMajor,
    /// Square groups of `tiles x tiles` sweep positions, finished one group at a time. Inside a
    /// group the four quadrants are visited in turn, each row by row.
    SuperBlock { tiles: usize },
}

impl Default for Traversal {
    fn default() -> Self {
        Self::SuperBlock {
            tiles: DEFAULT_SUPER_BLOCK_TILES,
        }
    }
}

impl Traversal {
    pub fn validate(&self) -> Result<(), RotateError> {
        match self {
            Self::SuperBlock { tiles: 0 } => Err(RotateError::EmptySuperBlock),
            _ => Ok(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotateConfig {
    pub traversal: Traversal,
    /// Spread the sweep over the rayon thread pool. Ignored unless the `parallel` feature is
    /// enabled.
    pub parallel: bool,
}

impl Default for RotateConfig {
    fn default() -> Self {
        Self {
            traversal: Traversal::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl RotateConfig {
    #[must_use]
    pub const fn serial(traversal: Traversal) -> Self {
        Self {
            traversal,
            parallel: false,
        }
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), RotateError> {
        self.traversal.validate()
    }
}
