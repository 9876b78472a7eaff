//! Word and byte transfers: the tail of every copy and the whole copy on CPUs
//! without a usable vector extension.
#![allow(unsafe_code)]

use crate::cursor::Cursor;

/// Native machine word moved by one scalar load/store pair.
pub type Word = usize;

/// Size of [`Word`] in bytes: 8 on 64-bit targets, 4 on 32-bit targets.
pub const WORD_SIZE: usize = core::mem::size_of::<Word>();

/// Copies `cur.remaining` bytes one at a time.
///
/// # Safety
///
/// The cursor's regions must be valid for `cur.remaining` bytes and must not
/// overlap.
#[inline(always)]
pub unsafe fn byte_transfer(cur: Cursor) -> Cursor {
    // SAFETY: forwarded caller contract.
    unsafe { byte_transfer_n(cur, cur.remaining) }
}

/// Copies the first `n` bytes of the cursor one at a time and returns the
/// cursor advanced past them.
///
/// # Safety
///
/// `n <= cur.remaining`; regions valid and non-overlapping as for
/// [`byte_transfer`].
#[inline(always)]
pub unsafe fn byte_transfer_n(cur: Cursor, n: usize) -> Cursor {
    let mut d = cur.dst;
    let mut s = cur.src;
    let end = d.wrapping_add(n);
    // SAFETY: caller guarantees `n` readable bytes at `src` and writable
    // bytes at `dst`.
    unsafe {
        while d != end {
            *d = *s;
            d = d.add(1);
            s = s.add(1);
        }
        cur.advance(n)
    }
}

/// Copies whole words with unaligned loads/stores, then finishes the
/// remaining `count % WORD_SIZE` bytes one at a time.
///
/// # Safety
///
/// Same as [`byte_transfer`].
#[inline]
pub unsafe fn word_transfer(cur: Cursor) -> Cursor {
    let chunks = cur.remaining / WORD_SIZE;
    let mut d = cur.dst as *mut Word;
    let mut s = cur.src as *const Word;

    for _ in 0..chunks {
        // SAFETY: read_unaligned/write_unaligned allow any alignment; caller
        // guarantees both regions cover `chunks * WORD_SIZE` bytes.
        unsafe {
            core::ptr::write_unaligned(d, core::ptr::read_unaligned(s));
            d = d.add(1);
            s = s.add(1);
        }
    }

    // SAFETY: the loop consumed exactly `chunks * WORD_SIZE` bytes.
    unsafe { byte_transfer(cur.advance(chunks * WORD_SIZE)) }
}
