//! Command line enums for the timing harness.
//!
//! Each variant can be given by its full name, any prefix that determines it uniquely, or a
//! short alias.

use bitspin_rotate::Traversal;
use clap::ValueEnum;
use clap::builder::PossibleValue;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TraversalOptions {
    RowMajor,
    SuperBlock,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KernelOptions {
    ColumnRotate,
    DeltaSwap,
}

/// Build the accepted spellings of one variant: every prefix of `base` from
/// `min_unique_base_prefix` characters on, plus every long-enough prefix of each alias.
///
/// `get_aliases("delta-swap", 1, Some(vec![("ds", 2)]))` accepts
///
/// ```text
/// d, de, del, delt, delta, delta-, delta-s, delta-sw, delta-swa, delta-swap, ds
/// ```
fn get_aliases(
    base: &'static str,
    min_unique_base_prefix: usize,
    alias: Option<Vec<(&'static str, usize)>>,
) -> PossibleValue {
    let prefixes = (min_unique_base_prefix..base.len()).map(|i| &base[..i]);
    match alias {
        None => PossibleValue::new(base).aliases(prefixes),
        Some(vec) => PossibleValue::new(base).aliases(prefixes.chain(
            vec.into_iter().flat_map(|(alias, min_unique)| {
                (min_unique..alias.len() + 1).map(|i| &alias[..i])
            }),
        )),
    }
}

impl ValueEnum for TraversalOptions {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::RowMajor, Self::SuperBlock]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::RowMajor => get_aliases("row-major", 1, Some(vec![("rows", 4)])),
            Self::SuperBlock => get_aliases("super-block", 1, Some(vec![("blocked", 1)])),
        })
    }
}

impl TraversalOptions {
    #[must_use]
    pub const fn traversal(self, super_block_tiles: usize) -> Traversal {
        match self {
            Self::RowMajor => Traversal::RowMajor,
            Self::SuperBlock => Traversal::SuperBlock {
                tiles: super_block_tiles,
            },
        }
    }
}

impl ValueEnum for KernelOptions {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::ColumnRotate, Self::DeltaSwap]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::ColumnRotate => get_aliases("column-rotate", 1, Some(vec![("network", 1)])),
            Self::DeltaSwap => get_aliases("delta-swap", 1, Some(vec![("ds", 2)])),
        })
    }
}
