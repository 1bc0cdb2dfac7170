use thiserror::Error;

/// Reasons a buffer or configuration cannot be rotated.
///
/// Every check runs before the first tile is touched, so a buffer rejected with one of these
/// errors is left exactly as it was.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RotateError {
    #[error("bit matrix side must be positive")]
    ZeroSide,

    #[error("bit matrix side {side} is not a multiple of 64")]
    SideNotMultipleOf64 { side: usize },

    #[error("bit matrix side {side} is too large to address")]
    SideTooLarge { side: usize },

    /// The buffer does not hold exactly `side * side` bits.
    #[error("a {side}x{side} bit matrix needs {expected} bytes, got {actual}")]
    BufferLength {
        side: usize,
        expected: usize,
        actual: usize,
    },

    #[error("super-blocks must span at least one tile")]
    EmptySuperBlock,
}
