//! CPU capability query and the ordered set of copy tiers.
//!
//! The executing CPU is probed once per process. The result can be capped
//! with the `TIERCOPY_MAX_TIER` environment variable, which is how benches
//! and tests force a narrower path on wide hardware.

use core::fmt;
use core::str::FromStr;
use std::sync::OnceLock;

use crate::error::CopyError;
use crate::scalar::WORD_SIZE;

/// Environment variable capping the widest tier [`CpuFeatures::get`] reports.
pub const MAX_TIER_ENV: &str = "TIERCOPY_MAX_TIER";

/// A transfer strategy, ordered narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Native-word transfers plus a byte tail. Always available.
    Word,
    /// SSE2, 16-byte chunks.
    Sse2,
    /// AVX2, 32-byte chunks.
    Avx2,
    /// AVX-512F, 64-byte chunks.
    Avx512,
}

impl Tier {
    /// Vector tiers, widest first: the order the dispatcher tries them in.
    pub const VECTOR: [Tier; 3] = [Tier::Avx512, Tier::Avx2, Tier::Sse2];

    /// Bytes moved by one load/store pair in this tier.
    pub const fn width(self) -> usize {
        match self {
            Tier::Word => WORD_SIZE,
            Tier::Sse2 => 16,
            Tier::Avx2 => 32,
            Tier::Avx512 => 64,
        }
    }

    /// Lowercase name, as accepted by [`MAX_TIER_ENV`].
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Word => "word",
            Tier::Sse2 => "sse2",
            Tier::Avx2 => "avx2",
            Tier::Avx512 => "avx512",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = CopyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avx512" | "avx512f" | "avx-512" => Ok(Tier::Avx512),
            "avx2" => Ok(Tier::Avx2),
            "sse2" => Ok(Tier::Sse2),
            "word" | "scalar" | "none" => Ok(Tier::Word),
            _ => Err(CopyError::UnknownTier(s.to_string())),
        }
    }
}

/// Instruction-set extensions the copy tiers depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    pub avx512f: bool,
    pub avx2: bool,
    pub sse2: bool,
}

static DETECTED: OnceLock<CpuFeatures> = OnceLock::new();

impl CpuFeatures {
    /// No vector extensions: every copy takes the word/byte path.
    pub const fn none() -> Self {
        Self {
            avx512f: false,
            avx2: false,
            sse2: false,
        }
    }

    /// Reports every extension up to and including `tier`.
    ///
    /// This describes a CPU, it does not probe one. Passing a set wider than
    /// the executing CPU supports to
    /// [`copy_block_with`](crate::memcpy::copy_block_with) is undefined
    /// behavior.
    pub const fn all_up_to(tier: Tier) -> Self {
        Self {
            avx512f: matches!(tier, Tier::Avx512),
            avx2: matches!(tier, Tier::Avx512 | Tier::Avx2),
            sse2: !matches!(tier, Tier::Word),
        }
    }

    /// Probes the executing CPU.
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn detect() -> Self {
        Self {
            avx512f: std::is_x86_feature_detected!("avx512f"),
            avx2: std::is_x86_feature_detected!("avx2"),
            sse2: std::is_x86_feature_detected!("sse2"),
        }
    }

    /// Probes the executing CPU. No vector tiers exist off x86.
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    pub fn detect() -> Self {
        Self::none()
    }

    /// Process-wide capability set, probed on first use and capped by
    /// [`MAX_TIER_ENV`] when it is set.
    pub fn get() -> Self {
        *DETECTED.get_or_init(|| {
            let detected = Self::detect();
            log::debug!(
                "detected copy tiers: avx512f={} avx2={} sse2={} (best: {})",
                detected.avx512f,
                detected.avx2,
                detected.sse2,
                detected.best_tier()
            );
            let raw = std::env::var(MAX_TIER_ENV).ok();
            detected.configured(raw.as_deref())
        })
    }

    /// Applies a raw [`MAX_TIER_ENV`] value to this set. `None` or an
    /// unparsable value leaves it unchanged.
    pub fn configured(self, raw: Option<&str>) -> Self {
        match max_tier_from(raw) {
            Some(max) => {
                let capped = self.cap(max);
                log::debug!("{MAX_TIER_ENV}={max}: using up to {}", capped.best_tier());
                capped
            }
            None => self,
        }
    }

    /// Clears every extension wider than `max`.
    pub fn cap(self, max: Tier) -> Self {
        Self {
            avx512f: self.avx512f && max >= Tier::Avx512,
            avx2: self.avx2 && max >= Tier::Avx2,
            sse2: self.sse2 && max >= Tier::Sse2,
        }
    }

    /// Whether this set allows `tier`. [`Tier::Word`] is always allowed.
    pub fn supports(&self, tier: Tier) -> bool {
        match tier {
            Tier::Avx512 => self.avx512f,
            Tier::Avx2 => self.avx2,
            Tier::Sse2 => self.sse2,
            Tier::Word => true,
        }
    }

    /// Widest tier this set allows.
    pub fn best_tier(&self) -> Tier {
        Tier::VECTOR
            .into_iter()
            .find(|&t| self.supports(t))
            .unwrap_or(Tier::Word)
    }
}

fn max_tier_from(raw: Option<&str>) -> Option<Tier> {
    match raw?.parse::<Tier>() {
        Ok(tier) => Some(tier),
        Err(e) => {
            log::warn!("ignoring {MAX_TIER_ENV}: {e}");
            None
        }
    }
}
