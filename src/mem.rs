//! Checked slice wrappers over [`copy_block`].
//!
//! A `&mut [u8]` and a `&[u8]` can never alias, so these functions get the
//! non-overlap precondition from the borrow checker instead of the caller.

use crate::error::{CopyError, Result};
use crate::memcpy::copy_block;

/// Copies all of `src` into the front of `dst`.
///
/// Returns the number of bytes copied, or
/// [`CopyError::DestinationTooSmall`] without touching `dst` when it cannot
/// hold `src`.
///
/// # Examples
/// ```
/// use tiercopy::mem::copy_into;
/// let mut dst = [0u8; 8];
/// assert_eq!(copy_into(&mut dst, b"hello"), Ok(5));
/// assert_eq!(&dst[..5], b"hello");
/// assert!(copy_into(&mut dst[..2], b"hello").is_err());
/// ```
pub fn copy_into(dst: &mut [u8], src: &[u8]) -> Result<usize> {
    if dst.len() < src.len() {
        return Err(CopyError::DestinationTooSmall {
            needed: src.len(),
            available: dst.len(),
        });
    }
    Ok(copy_prefix(dst, src))
}

/// Copies `min(dst.len(), src.len())` bytes and returns that count.
///
/// # Examples
/// ```
/// use tiercopy::mem::copy_prefix;
/// let mut dst = [0u8; 3];
/// assert_eq!(copy_prefix(&mut dst, b"hello"), 3);
/// assert_eq!(&dst, b"hel");
/// ```
pub fn copy_prefix(dst: &mut [u8], src: &[u8]) -> usize {
    let n = dst.len().min(src.len());
    // SAFETY: both slices cover `n` bytes and the borrows cannot overlap.
    unsafe {
        copy_block(dst.as_mut_ptr(), src.as_ptr(), n);
    }
    n
}
