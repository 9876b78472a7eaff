//! Error type for the safe slice API and tier configuration.

use thiserror::Error;

/// Errors reported outside the raw copy path.
///
/// [`copy_block`](crate::memcpy::copy_block) itself cannot fail; these only
/// come from the checked wrappers in [`mem`](crate::mem) and from parsing a
/// [`Tier`](crate::features::Tier) name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyError {
    #[error("destination holds {available} bytes but {needed} are required")]
    DestinationTooSmall { needed: usize, available: usize },

    #[error("unknown copy tier `{0}` (expected avx512, avx2, sse2 or word)")]
    UnknownTier(String),
}

pub type Result<T> = core::result::Result<T, CopyError>;
