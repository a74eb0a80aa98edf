//! # AArch64 NEON Kernels
//!
//! 16-byte NEON implementations of the kernel primitives. NEON has no
//! movemask instruction; the kernels narrow each 128-bit compare result
//! to a 64-bit mask with `vshrn` (4 bits per lane) and recover the first
//! hit with a trailing-bit count.

use super::dispatch::SimdProcessor;
use super::scalar::ScalarProcessor;
use crate::charclass;
use crate::config::NEON_WIDTH;
use std::arch::aarch64::*;

/// 16 bytes per iteration. NEON is baseline on aarch64, so constructing
/// this processor is always valid there.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeonProcessor;

/// Collapses a 128-bit byte-compare result into a 64-bit mask with four
/// bits per lane: lane `i` of `cmp` maps to bits `4i..4i+4`.
//
// SAFETY: Caller must be on aarch64 (NEON baseline).
#[inline]
unsafe fn lane_mask(cmp: uint8x16_t) -> u64 {
    let narrowed = vshrn_n_u16::<4>(vreinterpretq_u16_u8(cmp));
    vget_lane_u64::<0>(vreinterpret_u64_u8(narrowed))
}

// SAFETY: Caller must be on aarch64 (NEON baseline).
unsafe fn whitespace_mask(chunk: uint8x16_t) -> u64 {
    let space = vdupq_n_u8(b' ');
    let tab = vdupq_n_u8(b'\t');
    let newline = vdupq_n_u8(b'\n');
    let carriage = vdupq_n_u8(b'\r');

    let whitespace = vorrq_u8(
        vorrq_u8(vceqq_u8(chunk, space), vceqq_u8(chunk, tab)),
        vorrq_u8(vceqq_u8(chunk, newline), vceqq_u8(chunk, carriage)),
    );

    lane_mask(whitespace)
}

// SAFETY: Caller must be on aarch64 (NEON baseline).
unsafe fn find_whitespace_neon(data: &[u8]) -> usize {
    let len = data.len();
    let mut i = 0;

    while i + NEON_WIDTH <= len {
        let chunk = vld1q_u8(data.as_ptr().add(i));
        let mask = whitespace_mask(chunk);
        if mask != 0 {
            return i + (mask.trailing_zeros() / 4) as usize;
        }
        i += NEON_WIDTH;
    }

    i + ScalarProcessor::find_whitespace_impl(&data[i..])
}

// SAFETY: Caller must be on aarch64 (NEON baseline).
unsafe fn skip_whitespace_neon(data: &[u8]) -> usize {
    let len = data.len();
    let mut i = 0;

    while i + NEON_WIDTH <= len {
        let chunk = vld1q_u8(data.as_ptr().add(i));
        let mask = whitespace_mask(chunk);
        if mask != u64::MAX {
            return i + (mask.trailing_ones() / 4) as usize;
        }
        i += NEON_WIDTH;
    }

    i + ScalarProcessor::skip_whitespace_impl(&data[i..])
}

// SAFETY: Caller must be on aarch64 (NEON baseline).
unsafe fn matches_keyword_neon(data: &[u8], keyword: &[u8]) -> bool {
    let kw_len = keyword.len();
    if data.len() < kw_len || kw_len > NEON_WIDTH {
        return ScalarProcessor::matches_keyword_impl(data, keyword);
    }

    // Stage both sides in zeroed vectors so short inputs never read past
    // their slice.
    let mut data_buf = [0u8; NEON_WIDTH];
    let mut kw_buf = [0u8; NEON_WIDTH];
    let staged = data.len().min(NEON_WIDTH);
    data_buf[..staged].copy_from_slice(&data[..staged]);
    kw_buf[..kw_len].copy_from_slice(keyword);

    let fold = vdupq_n_u8(0xDF);
    let data_vec = vandq_u8(vld1q_u8(data_buf.as_ptr()), fold);
    let kw_vec = vandq_u8(vld1q_u8(kw_buf.as_ptr()), fold);

    let mask = lane_mask(vceqq_u8(data_vec, kw_vec));
    let expected = if kw_len == NEON_WIDTH {
        u64::MAX
    } else {
        (1u64 << (4 * kw_len)) - 1
    };
    if mask & expected != expected {
        return false;
    }

    if data.len() > kw_len {
        return !charclass::is_ident_cont(data[kw_len]);
    }
    true
}

impl SimdProcessor for NeonProcessor {
    #[inline]
    fn width(self) -> usize {
        NEON_WIDTH
    }

    #[inline]
    fn find_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: NEON is baseline on aarch64.
        unsafe { find_whitespace_neon(data) }
    }

    #[inline]
    fn skip_whitespace(self, data: &[u8]) -> usize {
        // SAFETY: as above.
        unsafe { skip_whitespace_neon(data) }
    }

    #[inline]
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool {
        // SAFETY: as above.
        unsafe { matches_keyword_neon(data, keyword) }
    }
}
