//! # x86_64 Kernels
//!
//! SSE4.2, AVX2, and AVX-512 implementations of the kernel primitives.
//! Each tier handles full vector-width chunks and hands its tail to the
//! next narrower tier, ending at the scalar reference.
//!
//! All vector functions are `#[target_feature]` and unsafe; the
//! [`Dispatcher`](super::dispatch::Dispatcher) only constructs a tier's
//! processor after [`CpuDetection`](super::cpu::CpuDetection) has
//! confirmed the feature, so the trait impls below wrap the calls in
//! `unsafe` with that invariant.

use super::dispatch::SimdProcessor;
use super::scalar::ScalarProcessor;
use crate::charclass;
use crate::config::{AVX2_WIDTH, AVX512_WIDTH, MAX_KEYWORD_LEN, SSE42_WIDTH};
use std::arch::x86_64::*;

/// 16 bytes per iteration via `pcmpestri` ranged string compares.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sse42Processor;

/// 32 bytes per iteration via broadcast compare + movemask.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx2Processor;

/// 64 bytes per iteration via byte compares into `__mmask64` registers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx512Processor;

const CMPESTRI_FIND: i32 = _SIDD_UBYTE_OPS | _SIDD_CMP_EQUAL_ANY | _SIDD_POSITIVE_POLARITY;
const CMPESTRI_SKIP: i32 = _SIDD_UBYTE_OPS | _SIDD_CMP_EQUAL_ANY | _SIDD_NEGATIVE_POLARITY;

#[inline]
fn whitespace_needle() -> __m128i {
    // Four needle bytes in the low lanes; cmpestri length caps at 4.
    // SAFETY: _mm_set_epi8 has no memory or CPU-state preconditions.
    unsafe {
        _mm_set_epi8(
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            b'\r' as i8,
            b'\n' as i8,
            b'\t' as i8,
            b' ' as i8,
        )
    }
}

// SAFETY: Caller must ensure the CPU supports SSE4.2.
#[target_feature(enable = "sse4.2")]
unsafe fn find_whitespace_sse42(data: &[u8]) -> usize {
    let needle = whitespace_needle();
    let len = data.len();
    let mut i = 0;

    while i + SSE42_WIDTH <= len {
        let chunk = _mm_loadu_si128(data.as_ptr().add(i) as *const __m128i);
        let idx = _mm_cmpestri::<CMPESTRI_FIND>(needle, 4, chunk, SSE42_WIDTH as i32);
        if (idx as usize) < SSE42_WIDTH {
            return i + idx as usize;
        }
        i += SSE42_WIDTH;
    }

    i + ScalarProcessor::find_whitespace_impl(&data[i..])
}

// SAFETY: Caller must ensure the CPU supports SSE4.2.
#[target_feature(enable = "sse4.2")]
unsafe fn skip_whitespace_sse42(data: &[u8]) -> usize {
    let needle = whitespace_needle();
    let len = data.len();
    let mut i = 0;

    while i + SSE42_WIDTH <= len {
        let chunk = _mm_loadu_si128(data.as_ptr().add(i) as *const __m128i);
        let idx = _mm_cmpestri::<CMPESTRI_SKIP>(needle, 4, chunk, SSE42_WIDTH as i32);
        if (idx as usize) < SSE42_WIDTH {
            return i + idx as usize;
        }
        i += SSE42_WIDTH;
    }

    i + ScalarProcessor::skip_whitespace_impl(&data[i..])
}

// SAFETY: Caller must ensure the CPU supports AVX2 (which implies SSE4.2
// for the tail cascade).
#[target_feature(enable = "avx2")]
unsafe fn find_whitespace_avx2(data: &[u8]) -> usize {
    let space = _mm256_set1_epi8(b' ' as i8);
    let tab = _mm256_set1_epi8(b'\t' as i8);
    let newline = _mm256_set1_epi8(b'\n' as i8);
    let carriage = _mm256_set1_epi8(b'\r' as i8);

    let len = data.len();
    let mut i = 0;

    while i + AVX2_WIDTH <= len {
        let chunk = _mm256_loadu_si256(data.as_ptr().add(i) as *const __m256i);

        let whitespace = _mm256_or_si256(
            _mm256_or_si256(
                _mm256_cmpeq_epi8(chunk, space),
                _mm256_cmpeq_epi8(chunk, tab),
            ),
            _mm256_or_si256(
                _mm256_cmpeq_epi8(chunk, newline),
                _mm256_cmpeq_epi8(chunk, carriage),
            ),
        );

        let mask = _mm256_movemask_epi8(whitespace) as u32;
        if mask != 0 {
            return i + mask.trailing_zeros() as usize;
        }
        i += AVX2_WIDTH;
    }

    i + find_whitespace_sse42(&data[i..])
}

// SAFETY: Caller must ensure the CPU supports AVX2 (which implies SSE4.2
// for the tail cascade).
#[target_feature(enable = "avx2")]
unsafe fn skip_whitespace_avx2(data: &[u8]) -> usize {
    let space = _mm256_set1_epi8(b' ' as i8);
    let tab = _mm256_set1_epi8(b'\t' as i8);
    let newline = _mm256_set1_epi8(b'\n' as i8);
    let carriage = _mm256_set1_epi8(b'\r' as i8);

    let len = data.len();
    let mut i = 0;

    while i + AVX2_WIDTH <= len {
        let chunk = _mm256_loadu_si256(data.as_ptr().add(i) as *const __m256i);

        let whitespace = _mm256_or_si256(
            _mm256_or_si256(
                _mm256_cmpeq_epi8(chunk, space),
                _mm256_cmpeq_epi8(chunk, tab),
            ),
            _mm256_or_si256(
                _mm256_cmpeq_epi8(chunk, newline),
                _mm256_cmpeq_epi8(chunk, carriage),
            ),
        );

        let mask = !(_mm256_movemask_epi8(whitespace) as u32);
        if mask != 0 {
            return i + mask.trailing_zeros() as usize;
        }
        i += AVX2_WIDTH;
    }

    i + skip_whitespace_sse42(&data[i..])
}

// SAFETY: Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
unsafe fn matches_keyword_avx2(data: &[u8], keyword: &[u8]) -> bool {
    let kw_len = keyword.len();
    if data.len() < kw_len || kw_len > MAX_KEYWORD_LEN {
        return ScalarProcessor::matches_keyword_impl(data, keyword);
    }

    // Stage both sides in zeroed vectors so short inputs never read past
    // their slice.
    let mut data_buf = [0u8; AVX2_WIDTH];
    let mut kw_buf = [0u8; AVX2_WIDTH];
    let staged = data.len().min(AVX2_WIDTH);
    data_buf[..staged].copy_from_slice(&data[..staged]);
    kw_buf[..kw_len].copy_from_slice(keyword);

    let fold = _mm256_set1_epi8(0xDFu8 as i8);
    let data_vec = _mm256_and_si256(
        _mm256_loadu_si256(data_buf.as_ptr() as *const __m256i),
        fold,
    );
    let kw_vec = _mm256_and_si256(_mm256_loadu_si256(kw_buf.as_ptr() as *const __m256i), fold);

    let mask = _mm256_movemask_epi8(_mm256_cmpeq_epi8(data_vec, kw_vec)) as u32;
    let expected = if kw_len == AVX2_WIDTH {
        u32::MAX
    } else {
        (1u32 << kw_len) - 1
    };
    if mask & expected != expected {
        return false;
    }

    if data.len() > kw_len {
        return !charclass::is_ident_cont(data[kw_len]);
    }
    true
}

// SAFETY: Caller must ensure the CPU supports AVX-512F and AVX-512BW
// (which imply AVX2 for the tail cascade).
#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn find_whitespace_avx512(data: &[u8]) -> usize {
    let space = _mm512_set1_epi8(b' ' as i8);
    let tab = _mm512_set1_epi8(b'\t' as i8);
    let newline = _mm512_set1_epi8(b'\n' as i8);
    let carriage = _mm512_set1_epi8(b'\r' as i8);

    let len = data.len();
    let mut i = 0;

    while i + AVX512_WIDTH <= len {
        let chunk = _mm512_loadu_epi8(data.as_ptr().add(i) as *const i8);

        let whitespace = _mm512_cmpeq_epi8_mask(chunk, space)
            | _mm512_cmpeq_epi8_mask(chunk, tab)
            | _mm512_cmpeq_epi8_mask(chunk, newline)
            | _mm512_cmpeq_epi8_mask(chunk, carriage);

        if whitespace != 0 {
            return i + whitespace.trailing_zeros() as usize;
        }
        i += AVX512_WIDTH;
    }

    i + find_whitespace_avx2(&data[i..])
}

// SAFETY: Caller must ensure the CPU supports AVX-512F and AVX-512BW
// (which imply AVX2 for the tail cascade).
#[target_feature(enable = "avx512f", enable = "avx512bw")]
unsafe fn skip_whitespace_avx512(data: &[u8]) -> usize {
    let space = _mm512_set1_epi8(b' ' as i8);
    let tab = _mm512_set1_epi8(b'\t' as i8);
    let newline = _mm512_set1_epi8(b'\n' as i8);
    let carriage = _mm512_set1_epi8(b'\r' as i8);

    let len = data.len();
    let mut i = 0;

    while i + AVX512_WIDTH <= len {
        let chunk = _mm512_loadu_epi8(data.as_ptr().add(i) as *const i8);

        let whitespace = _mm512_cmpeq_epi8_mask(chunk, space)
            | _mm512_cmpeq_epi8_mask(chunk, tab)
            | _mm512_cmpeq_epi8_mask(chunk, newline)
            | _mm512_cmpeq_epi8_mask(chunk, carriage);

        let non_whitespace = !whitespace;
        if non_whitespace != 0 {
            return i + non_whitespace.trailing_zeros() as usize;
        }
        i += AVX512_WIDTH;
    }

    i + skip_whitespace_avx2(&data[i..])
}

impl SimdProcessor for Sse42Processor {
    #[inline]
    fn width(self) -> usize {
        SSE42_WIDTH
    }

    #[inline]
    fn find_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: this processor is only dispatched on hosts that report
        // SSE4.2.
        unsafe { find_whitespace_sse42(data) }
    }

    #[inline]
    fn skip_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: as above.
        unsafe { skip_whitespace_sse42(data) }
    }

    #[inline]
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool {
        // Keyword candidates are at most 13 bytes; a ranged string compare
        // buys nothing over the scalar loop here.
        ScalarProcessor::matches_keyword_impl(data, keyword)
    }
}

impl SimdProcessor for Avx2Processor {
    #[inline]
    fn width(self) -> usize {
        AVX2_WIDTH
    }

    #[inline]
    fn find_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: this processor is only dispatched on hosts that report
        // AVX2.
        unsafe { find_whitespace_avx2(data) }
    }

    #[inline]
    fn skip_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: as above.
        unsafe { skip_whitespace_avx2(data) }
    }

    #[inline]
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool {
        // SAFETY: as above.
        unsafe { matches_keyword_avx2(data, keyword) }
    }
}

impl SimdProcessor for Avx512Processor {
    #[inline]
    fn width(self) -> usize {
        AVX512_WIDTH
    }

    #[inline]
    fn find_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: this processor is only dispatched on hosts that report
        // AVX-512F/BW/VL.
        unsafe { find_whitespace_avx512(data) }
    }

    #[inline]
    fn skip_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: as above.
        unsafe { skip_whitespace_avx512(data) }
    }

    #[inline]
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool {
        // A 32-byte compare already covers the longest keyword.
        // SAFETY: AVX-512 implies AVX2.
        unsafe { matches_keyword_avx2(data, keyword) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_corpus() -> Vec<u8> {
        let mut buf = Vec::new();
        for i in 0..257usize {
            if i % 7 == 0 {
                buf.push(b' ');
            } else if i % 13 == 0 {
                buf.push(b'\n');
            } else {
                buf.push(b'a' + (i % 26) as u8);
            }
        }
        buf
    }

    #[test]
    fn sse42_matches_scalar_on_all_suffixes() {
        if !is_x86_feature_detected!("sse4.2") {
            return;
        }
        let corpus = mixed_corpus();
        for start in 0..corpus.len() {
            let window = &corpus[start..];
            // SAFETY: feature checked above.
            unsafe {
                assert_eq!(
                    find_whitespace_sse42(window),
                    ScalarProcessor::find_whitespace_impl(window),
                    "find diverged at offset {start}"
                );
                assert_eq!(
                    skip_whitespace_sse42(window),
                    ScalarProcessor::skip_whitespace_impl(window),
                    "skip diverged at offset {start}"
                );
            }
        }
    }

    #[test]
    fn avx2_matches_scalar_on_all_suffixes() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let corpus = mixed_corpus();
        for start in 0..corpus.len() {
            let window = &corpus[start..];
            // SAFETY: feature checked above.
            unsafe {
                assert_eq!(
                    find_whitespace_avx2(window),
                    ScalarProcessor::find_whitespace_impl(window)
                );
                assert_eq!(
                    skip_whitespace_avx2(window),
                    ScalarProcessor::skip_whitespace_impl(window)
                );
            }
        }
    }

    #[test]
    fn avx512_matches_scalar_on_all_suffixes() {
        if !(is_x86_feature_detected!("avx512f") && is_x86_feature_detected!("avx512bw")) {
            return;
        }
        let corpus = mixed_corpus();
        for start in 0..corpus.len() {
            let window = &corpus[start..];
            // SAFETY: feature checked above.
            unsafe {
                assert_eq!(
                    find_whitespace_avx512(window),
                    ScalarProcessor::find_whitespace_impl(window)
                );
                assert_eq!(
                    skip_whitespace_avx512(window),
                    ScalarProcessor::skip_whitespace_impl(window)
                );
            }
        }
    }

    #[test]
    fn avx2_keyword_match_agrees_with_scalar() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let cases: &[(&[u8], &[u8])] = &[
            (b"SELECT", b"SELECT"),
            (b"select", b"SELECT"),
            (b"SELECTS", b"SELECT"),
            (b"SELECT ", b"SELECT"),
            (b"SELEC", b"SELECT"),
            (b"authorization", b"AUTHORIZATION"),
            (b"AUTHORIZATIONX", b"AUTHORIZATION"),
            (b"as", b"AS"),
            (b"a", b"AS"),
        ];
        for &(data, kw) in cases {
            // SAFETY: feature checked above.
            let got = unsafe { matches_keyword_avx2(data, kw) };
            assert_eq!(
                got,
                ScalarProcessor::matches_keyword_impl(data, kw),
                "diverged on {:?} vs {:?}",
                data,
                kw
            );
        }
    }
}
