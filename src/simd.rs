//! Vector copy tiers for x86/x86_64.
//!
//! Each tier copies the destination head byte-wise until `dst` sits on a
//! chunk boundary, then moves whole chunks with one unaligned load and one
//! aligned store each. Whatever is left (always less than one chunk) comes
//! back in the cursor for [`word_transfer`](crate::scalar::word_transfer).
//!
//! | Tier     | Extension | Chunk |
//! |----------|-----------|-------|
//! | `Avx512` | AVX-512F  | 64 B  |
//! | `Avx2`   | AVX2      | 32 B  |
//! | `Sse2`   | SSE2      | 16 B  |
//!
//! # Safety
//!
//! Every function here is unsafe. Callers must ensure:
//! - the cursor's regions are valid for `remaining` bytes and do not overlap
//! - the executing CPU supports the tier's extension

#![allow(unsafe_code)]

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::cursor::Cursor;
use crate::scalar::byte_transfer_n;

pub const AVX512_WIDTH: usize = 64;
pub const AVX2_WIDTH: usize = 32;
pub const SSE2_WIDTH: usize = 16;

/// Copies the bytes in front of the first `width`-aligned destination address.
///
/// # Safety
///
/// `cur.remaining >= width - 1`, which holds whenever the dispatcher picked
/// the tier (it requires `remaining >= width`).
#[inline(always)]
unsafe fn align_head(cur: Cursor, width: usize) -> Cursor {
    let head = cur.head_len(width);
    debug_assert!(head <= cur.remaining);
    // SAFETY: `head < width <= remaining`, caller guarantees validity.
    unsafe { byte_transfer_n(cur, head) }
}

// =============================================================================
// AVX-512F: 64-byte chunks
// =============================================================================

/// # Safety
///
/// See the module docs; AVX-512F must be available.
#[target_feature(enable = "avx512f")]
pub unsafe fn copy_avx512(cur: Cursor) -> Cursor {
    // SAFETY: caller upholds the module contract.
    unsafe {
        let cur = align_head(cur, AVX512_WIDTH);
        let chunks = cur.remaining / AVX512_WIDTH;
        let mut d = cur.dst;
        let mut s = cur.src;

        for _ in 0..chunks {
            // Loads are unaligned; `d` is 64-byte aligned after the head and
            // advances in 64-byte steps, so the aligned store is valid.
            let v = _mm512_loadu_epi32(s as *const i32);
            _mm512_store_epi32(d as *mut i32, v);
            d = d.add(AVX512_WIDTH);
            s = s.add(AVX512_WIDTH);
        }

        cur.advance(chunks * AVX512_WIDTH)
    }
}

// =============================================================================
// AVX2: 32-byte chunks
// =============================================================================

/// # Safety
///
/// See the module docs; AVX2 must be available.
#[target_feature(enable = "avx2")]
pub unsafe fn copy_avx2(cur: Cursor) -> Cursor {
    // SAFETY: caller upholds the module contract.
    unsafe {
        let cur = align_head(cur, AVX2_WIDTH);
        let chunks = cur.remaining / AVX2_WIDTH;
        let mut d = cur.dst;
        let mut s = cur.src;

        for _ in 0..chunks {
            let v = _mm256_loadu_si256(s as *const __m256i);
            _mm256_store_si256(d as *mut __m256i, v);
            d = d.add(AVX2_WIDTH);
            s = s.add(AVX2_WIDTH);
        }

        cur.advance(chunks * AVX2_WIDTH)
    }
}

// =============================================================================
// SSE2: 16-byte chunks
// =============================================================================

/// # Safety
///
/// See the module docs; SSE2 must be available.
#[target_feature(enable = "sse2")]
pub unsafe fn copy_sse2(cur: Cursor) -> Cursor {
    // SAFETY: caller upholds the module contract.
    unsafe {
        let cur = align_head(cur, SSE2_WIDTH);
        let chunks = cur.remaining / SSE2_WIDTH;
        let mut d = cur.dst;
        let mut s = cur.src;

        for _ in 0..chunks {
            let v = _mm_loadu_si128(s as *const __m128i);
            _mm_store_si128(d as *mut __m128i, v);
            d = d.add(SSE2_WIDTH);
            s = s.add(SSE2_WIDTH);
        }

        cur.advance(chunks * SSE2_WIDTH)
    }
}
