//! Transfer cursor threaded through every copy tier.

/// Progress through one copy: the next destination byte, the next source
/// byte, and how many bytes are still owed.
///
/// Tiers take a cursor by value and hand back the advanced one, so the two
/// pointers always move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub dst: *mut u8,
    pub src: *const u8,
    pub remaining: usize,
}

impl Cursor {
    #[inline(always)]
    pub fn new(dst: *mut u8, src: *const u8, remaining: usize) -> Self {
        Self { dst, src, remaining }
    }

    /// Moves both pointers forward by `n` bytes and shrinks `remaining`.
    ///
    /// # Safety
    ///
    /// `n <= self.remaining`, and both pointers must stay inside (or one past)
    /// their allocations.
    #[inline(always)]
    pub unsafe fn advance(self, n: usize) -> Self {
        debug_assert!(n <= self.remaining);
        // SAFETY: caller keeps `n` within the regions the cursor was built on.
        unsafe {
            Self {
                dst: self.dst.add(n),
                src: self.src.add(n),
                remaining: self.remaining - n,
            }
        }
    }

    /// Bytes needed to bring `dst` up to a multiple of `width`.
    #[inline(always)]
    pub fn head_len(&self, width: usize) -> usize {
        debug_assert!(width.is_power_of_two());
        (width - (self.dst as usize & (width - 1))) & (width - 1)
    }

    #[inline(always)]
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}
