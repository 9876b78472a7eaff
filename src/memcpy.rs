//! Block copy with runtime tier dispatch.
//!
//! The dispatcher picks the widest vector tier the CPU supports and the
//! count can fill at least once, lets that tier align the destination and
//! move whole chunks, then finishes with native words and single bytes.
//! A committed tier never hands its residue to a narrower vector tier: the
//! residue is always shorter than one chunk and the word path finishes it
//! without another alignment prologue.
#![allow(unsafe_code)]

use crate::cursor::Cursor;
use crate::features::{CpuFeatures, Tier};
use crate::scalar::{WORD_SIZE, byte_transfer, word_transfer};
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::simd::{copy_avx2, copy_avx512, copy_sse2};

/// Copies `count` bytes from `src` to `dst` and returns `dst`.
///
/// Uses the process-wide capability set from [`CpuFeatures::get`].
///
/// # Safety
///
/// - `dst` must be valid for writes and `src` valid for reads of `count` bytes
/// - the regions must not overlap (checked only in debug builds)
/// - with `count == 0` neither pointer is dereferenced
#[inline]
pub unsafe fn copy_block(dst: *mut u8, src: *const u8, count: usize) -> *mut u8 {
    // SAFETY: forwarded caller contract; `get` only reports probed features.
    unsafe { copy_block_with(CpuFeatures::get(), dst, src, count) }
}

/// Same as [`copy_block`] but dispatches on an explicit capability set.
///
/// # Safety
///
/// Everything [`copy_block`] requires, and `features` must not claim an
/// extension the executing CPU lacks.
pub unsafe fn copy_block_with(
    features: CpuFeatures,
    dst: *mut u8,
    src: *const u8,
    count: usize,
) -> *mut u8 {
    debug_assert!(
        regions_disjoint(dst, src, count),
        "copy_block regions overlap: dst={dst:p} src={src:p} count={count}"
    );

    let cur = Cursor::new(dst, src, count);

    // SAFETY: caller guarantees both regions cover `count` bytes, do not
    // overlap, and that `features` matches the CPU.
    unsafe {
        if count < WORD_SIZE {
            byte_transfer(cur);
            return dst;
        }

        let rest = match select_tier(features, count) {
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Tier::Avx512 => copy_avx512(cur),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Tier::Avx2 => copy_avx2(cur),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Tier::Sse2 => copy_sse2(cur),
            _ => cur,
        };

        word_transfer(rest);
    }
    dst
}

/// Tier the dispatcher commits to for `count` bytes.
///
/// Vector tiers are tried widest first; a tier qualifies when the CPU
/// supports it and `count` covers at least one full chunk.
#[inline]
pub fn select_tier(features: CpuFeatures, count: usize) -> Tier {
    if count < WORD_SIZE {
        return Tier::Word;
    }
    Tier::VECTOR
        .into_iter()
        .find(|&tier| count >= tier.width() && features.supports(tier))
        .unwrap_or(Tier::Word)
}

fn regions_disjoint(dst: *mut u8, src: *const u8, count: usize) -> bool {
    let d = dst as usize;
    let s = src as usize;
    count == 0 || d.saturating_add(count) <= s || s.saturating_add(count) <= d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    /// Every capability set the executing CPU can actually run.
    fn runnable_sets() -> Vec<CpuFeatures> {
        let detected = CpuFeatures::detect();
        [Tier::Avx512, Tier::Avx2, Tier::Sse2, Tier::Word]
            .into_iter()
            .map(|t| detected.cap(t))
            .collect()
    }

    fn offset_to_align(buf: &[u8], align: usize) -> usize {
        (align - (buf.as_ptr() as usize & (align - 1))) & (align - 1)
    }

    #[test]
    fn test_select_tier_order() {
        let all = CpuFeatures::all_up_to(Tier::Avx512);
        assert_eq!(select_tier(all, 0), Tier::Word);
        assert_eq!(select_tier(all, WORD_SIZE - 1), Tier::Word);
        assert_eq!(select_tier(all, 15), Tier::Word);
        assert_eq!(select_tier(all, 16), Tier::Sse2);
        assert_eq!(select_tier(all, 31), Tier::Sse2);
        assert_eq!(select_tier(all, 32), Tier::Avx2);
        assert_eq!(select_tier(all, 63), Tier::Avx2);
        assert_eq!(select_tier(all, 64), Tier::Avx512);
        assert_eq!(select_tier(all, 1 << 20), Tier::Avx512);
    }

    #[test]
    fn test_select_tier_skips_unsupported() {
        let avx2 = CpuFeatures::all_up_to(Tier::Avx2);
        assert_eq!(select_tier(avx2, 4096), Tier::Avx2);

        let odd = CpuFeatures {
            avx512f: true,
            avx2: false,
            sse2: true,
        };
        assert_eq!(select_tier(odd, 40), Tier::Sse2);
        assert_eq!(select_tier(odd, 64), Tier::Avx512);

        assert_eq!(select_tier(CpuFeatures::none(), 4096), Tier::Word);
    }

    #[test]
    fn test_zero_count_returns_dst_without_access() {
        let dst = core::ptr::NonNull::<u8>::dangling().as_ptr();
        let src = core::ptr::NonNull::<u8>::dangling().as_ptr() as *const u8;
        for features in runnable_sets() {
            let out = unsafe { copy_block_with(features, dst, src, 0) };
            assert_eq!(out, dst);
        }
    }

    #[test]
    fn test_copy_block_0_to_1024() {
        let src = pattern(1024);
        let mut dst = [0u8; 1025];

        for features in runnable_sets() {
            for n in 0..=1024 {
                dst.fill(0);
                let out = unsafe { copy_block_with(features, dst.as_mut_ptr(), src.as_ptr(), n) };
                assert_eq!(out, dst.as_mut_ptr());
                assert_eq!(&dst[..n], &src[..n], "Failed at size {n} ({features:?})");
                assert_eq!(dst[n], 0, "Overwrote at size {n} ({features:?})");
            }
        }
    }

    #[test]
    fn test_copy_block_alignment() {
        let src_full = pattern(1200);
        let mut dst_full = vec![0u8; 1200];
        let src_base = offset_to_align(&src_full, 64);
        let dst_base = offset_to_align(&dst_full, 64);

        let sizes = [
            0,
            1,
            WORD_SIZE - 1,
            WORD_SIZE,
            15,
            16,
            17,
            31,
            32,
            33,
            63,
            64,
            65,
            127,
            128,
            129,
            255,
            256,
            257,
            1000,
        ];

        for features in runnable_sets() {
            for src_off in [0, 1, 2, 3, 7, 8, 15, 31, 63] {
                for dst_off in 0..64 {
                    for n in sizes {
                        dst_full.fill(0);
                        let d = dst_base + dst_off;
                        let s = src_base + src_off;
                        unsafe {
                            copy_block_with(
                                features,
                                dst_full.as_mut_ptr().add(d),
                                src_full.as_ptr().add(s),
                                n,
                            );
                        }
                        assert_eq!(
                            &dst_full[d..d + n],
                            &src_full[s..s + n],
                            "size {n} src_off {src_off} dst_off {dst_off} ({features:?})"
                        );
                        assert!(dst_full[..d].iter().all(|&b| b == 0));
                        assert!(dst_full[d + n..].iter().all(|&b| b == 0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_small_copy_on_byte_path() {
        let src = *b"hello, world";
        let mut dst = [0u8; 12];
        let out = unsafe { copy_block(dst.as_mut_ptr().add(1), src.as_ptr().add(2), 5) };
        assert_eq!(out, unsafe { dst.as_mut_ptr().add(1) });
        assert_eq!(&dst[1..6], b"llo, ");
        assert_eq!(dst[0], 0);
        assert!(dst[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_4096_with_src_offset_3() {
        let src = pattern(4096 + 3);
        let mut dst = vec![0u8; 4096 + 128];
        let base = offset_to_align(&dst, 64);
        unsafe { copy_block(dst.as_mut_ptr().add(base), src.as_ptr().add(3), 4096) };
        assert_eq!(&dst[base..base + 4096], &src[3..]);
        assert!(dst[base + 4096..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_one_chunk_plus_one() {
        let src = pattern(200);
        let mut dst = vec![0u8; 256];
        let base = offset_to_align(&dst, 64);
        for features in runnable_sets() {
            let n = features.best_tier().width() + 1;
            dst.fill(0);
            unsafe { copy_block_with(features, dst.as_mut_ptr().add(base), src.as_ptr(), n) };
            assert_eq!(&dst[base..base + n], &src[..n]);
            assert_eq!(dst[base + n], 0);
        }
    }

    #[test]
    fn test_regions_disjoint() {
        let buf = [0u8; 32];
        let p = buf.as_ptr();
        let q = unsafe { p.add(16) };
        assert!(regions_disjoint(q as *mut u8, p, 16));
        assert!(regions_disjoint(p as *mut u8, q, 16));
        assert!(!regions_disjoint(q as *mut u8, p, 17));
        assert!(!regions_disjoint(p as *mut u8, p, 1));
        assert!(regions_disjoint(p as *mut u8, p, 0));
    }
}
