//! # CPU Feature Detection
//!
//! Probes the host CPU once and caches the best available SIMD tier for
//! the lifetime of the process. Detection is safe under concurrent
//! first-call contention: a compare-and-set on a done flag elects one
//! prober, which publishes the tier with a release store; readers pair it
//! with an acquire load.
//!
//! On x86_64 the probe checks SSE4.2, AVX2, and the AVX-512 F+BW+VL
//! trio and keeps the highest tier found. NEON is baseline on aarch64.
//! Every other architecture runs scalar.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tracing::debug;

/// SIMD instruction-set tier, ordered by preference within an
/// architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SimdLevel {
    Scalar = 0,
    Sse42 = 1,
    Avx2 = 2,
    Avx512 = 3,
    Neon = 4,
}

impl SimdLevel {
    /// Human-readable tier name for logs and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            SimdLevel::Scalar => "Scalar",
            SimdLevel::Sse42 => "SSE4.2",
            SimdLevel::Avx2 => "AVX2",
            SimdLevel::Avx512 => "AVX-512",
            SimdLevel::Neon => "ARM NEON",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => SimdLevel::Sse42,
            2 => SimdLevel::Avx2,
            3 => SimdLevel::Avx512,
            4 => SimdLevel::Neon,
            _ => SimdLevel::Scalar,
        }
    }
}

static DETECTED_LEVEL: AtomicU8 = AtomicU8::new(SimdLevel::Scalar as u8);
static DETECTION_DONE: AtomicBool = AtomicBool::new(false);

/// One-shot CPU capability probe.
pub struct CpuDetection;

impl CpuDetection {
    /// Returns the cached SIMD tier, probing the CPU on the first call.
    pub fn detect() -> SimdLevel {
        if DETECTION_DONE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let level = Self::probe();
            DETECTED_LEVEL.store(level as u8, Ordering::Release);
            debug!(level = level.name(), "simd tier detected");
        }

        SimdLevel::from_u8(DETECTED_LEVEL.load(Ordering::Acquire))
    }

    /// Name of the detected tier.
    pub fn level_name() -> &'static str {
        Self::detect().name()
    }

    pub fn supports_sse42() -> bool {
        matches!(
            Self::detect(),
            SimdLevel::Sse42 | SimdLevel::Avx2 | SimdLevel::Avx512
        )
    }

    pub fn supports_avx2() -> bool {
        matches!(Self::detect(), SimdLevel::Avx2 | SimdLevel::Avx512)
    }

    pub fn supports_avx512() -> bool {
        Self::detect() == SimdLevel::Avx512
    }

    pub fn supports_neon() -> bool {
        Self::detect() == SimdLevel::Neon
    }

    #[cfg(target_arch = "x86_64")]
    fn probe() -> SimdLevel {
        let mut level = SimdLevel::Scalar;

        if is_x86_feature_detected!("sse4.2") {
            level = SimdLevel::Sse42;
        }
        if is_x86_feature_detected!("avx2") {
            level = SimdLevel::Avx2;
        }
        if is_x86_feature_detected!("avx512f")
            && is_x86_feature_detected!("avx512bw")
            && is_x86_feature_detected!("avx512vl")
        {
            level = SimdLevel::Avx512;
        }

        level
    }

    #[cfg(target_arch = "aarch64")]
    fn probe() -> SimdLevel {
        SimdLevel::Neon
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn probe() -> SimdLevel {
        SimdLevel::Scalar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_is_idempotent() {
        let first = CpuDetection::detect();
        for _ in 0..8 {
            assert_eq!(CpuDetection::detect(), first);
        }
    }

    #[test]
    fn level_name_is_stable() {
        let name = CpuDetection::level_name();
        assert!(["Scalar", "SSE4.2", "AVX2", "AVX-512", "ARM NEON"].contains(&name));
        assert_eq!(name, CpuDetection::detect().name());
    }

    #[test]
    fn tier_matches_architecture() {
        let level = CpuDetection::detect();
        #[cfg(target_arch = "aarch64")]
        assert_eq!(level, SimdLevel::Neon);
        #[cfg(target_arch = "x86_64")]
        assert_ne!(level, SimdLevel::Neon);
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        assert_eq!(level, SimdLevel::Scalar);
    }

    #[test]
    fn support_predicates_are_consistent() {
        if CpuDetection::supports_avx512() {
            assert!(CpuDetection::supports_avx2());
        }
        if CpuDetection::supports_avx2() {
            assert!(CpuDetection::supports_sse42());
        }
    }
}
