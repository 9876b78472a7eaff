//! tiercopy: a non-overlapping block copy that picks AVX-512F, AVX2, SSE2 or
//! native-word transfers at runtime.

pub mod cursor;
pub mod error;
pub mod features;
pub mod mem;
pub mod memcpy;
pub mod scalar;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod simd;

pub use error::CopyError;
pub use features::{CpuFeatures, Tier};
pub use memcpy::{copy_block, copy_block_with, select_tier};
pub use scalar::WORD_SIZE;
