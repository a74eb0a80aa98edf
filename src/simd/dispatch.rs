//! # Tier Dispatch
//!
//! Routes kernel operations to the processor matching the detected CPU
//! tier. Operations implement [`SimdOp`], a callable generic over the
//! processor type, and [`Dispatcher::dispatch`] resolves the tier with a
//! dense match, so every operation monomorphizes per processor and the
//! kernel call inlines at each site. No virtual calls on the hot path.

use super::cpu::{CpuDetection, SimdLevel};
use super::scalar::ScalarProcessor;

#[cfg(target_arch = "aarch64")]
use super::neon::NeonProcessor;
#[cfg(target_arch = "x86_64")]
use super::x86::{Avx2Processor, Avx512Processor, Sse42Processor};

/// The kernel primitives every tier implements.
///
/// Contracts are identical across tiers; only throughput differs. All
/// three operate on unaligned buffers of any length.
pub trait SimdProcessor: Copy {
    /// Bytes consumed per vector iteration (1 for scalar).
    fn width(self) -> usize;

    /// Index of the first whitespace byte, or `data.len()` if none.
    fn find_whitespace(self, data: &[u8]) -> usize;

    /// Index of the first non-whitespace byte, or `data.len()` if all
    /// whitespace.
    fn skip_whitespace(self, data: &[u8]) -> usize;

    /// ASCII case-insensitive compare of `data` against an uppercase
    /// `keyword`, requiring a word boundary after the match when `data`
    /// extends past the keyword.
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool;
}

impl SimdProcessor for ScalarProcessor {
    #[inline]
    fn width(self) -> usize {
        1
    }

    #[inline]
    fn find_whitespace(self, data: &[u8]) -> usize {
        ScalarProcessor::find_whitespace_impl(data)
    }

    #[inline]
    fn skip_whitespace(self, data: &[u8]) -> usize {
        ScalarProcessor::skip_whitespace_impl(data)
    }

    #[inline]
    fn matches_keyword(self, data: &[u8], keyword: &[u8]) -> bool {
        ScalarProcessor::matches_keyword_impl(data, keyword)
    }
}

/// An operation to run under the detected tier's processor.
///
/// The trait stands in for a closure generic over the processor type,
/// which Rust closures cannot express directly.
pub trait SimdOp {
    type Output;

    fn run<P: SimdProcessor>(self, processor: P) -> Self::Output;
}

/// Resolves the detected tier to a concrete processor per operation.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    level: SimdLevel,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            level: CpuDetection::detect(),
        }
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }

    pub fn level_name(&self) -> &'static str {
        self.level.name()
    }

    /// Runs `op` with the processor for the detected tier.
    #[inline]
    pub fn dispatch<Op: SimdOp>(&self, op: Op) -> Op::Output {
        #[cfg(target_arch = "x86_64")]
        let output = match self.level {
            SimdLevel::Avx512 => op.run(Avx512Processor),
            SimdLevel::Avx2 => op.run(Avx2Processor),
            SimdLevel::Sse42 => op.run(Sse42Processor),
            _ => op.run(ScalarProcessor),
        };

        #[cfg(target_arch = "aarch64")]
        let output = match self.level {
            SimdLevel::Neon => op.run(NeonProcessor),
            _ => op.run(ScalarProcessor),
        };

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        let output = op.run(ScalarProcessor);

        output
    }

    /// Dispatched [`SimdProcessor::skip_whitespace`].
    #[inline]
    pub fn skip_whitespace(&self, data: &[u8]) -> usize {
        self.dispatch(SkipWhitespace { data })
    }

    /// Dispatched [`SimdProcessor::find_whitespace`].
    #[inline]
    pub fn find_whitespace(&self, data: &[u8]) -> usize {
        self.dispatch(FindWhitespace { data })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

struct SkipWhitespace<'a> {
    data: &'a [u8],
}

impl SimdOp for SkipWhitespace<'_> {
    type Output = usize;

    #[inline]
    fn run<P: SimdProcessor>(self, processor: P) -> usize {
        processor.skip_whitespace(self.data)
    }
}

struct FindWhitespace<'a> {
    data: &'a [u8],
}

impl SimdOp for FindWhitespace<'_> {
    type Output = usize;

    #[inline]
    fn run<P: SimdProcessor>(self, processor: P) -> usize {
        processor.find_whitespace(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatcher_reports_detected_level() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.level(), CpuDetection::detect());
        assert_eq!(dispatcher.level_name(), CpuDetection::level_name());
    }

    #[test]
    fn dispatched_kernels_match_scalar() {
        let dispatcher = Dispatcher::new();

        let mut corpus = Vec::new();
        for i in 0..300usize {
            match i % 11 {
                0 => corpus.push(b' '),
                1 => corpus.push(b'\n'),
                5 => corpus.push(b'\t'),
                _ => corpus.push(b'x'),
            }
        }

        for start in 0..corpus.len() {
            let window = &corpus[start..];
            assert_eq!(
                dispatcher.find_whitespace(window),
                ScalarProcessor::find_whitespace_impl(window)
            );
            assert_eq!(
                dispatcher.skip_whitespace(window),
                ScalarProcessor::skip_whitespace_impl(window)
            );
        }
    }

    #[test]
    fn whitespace_kernels_handle_empty_and_degenerate_input() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.skip_whitespace(b""), 0);
        assert_eq!(dispatcher.find_whitespace(b""), 0);
        assert_eq!(dispatcher.skip_whitespace(b"x"), 0);
        assert_eq!(dispatcher.find_whitespace(b" "), 0);

        let all_ws = vec![b' '; 1000];
        assert_eq!(dispatcher.skip_whitespace(&all_ws), 1000);
        assert_eq!(dispatcher.find_whitespace(&all_ws), 0);

        let no_ws = vec![b'q'; 1000];
        assert_eq!(dispatcher.skip_whitespace(&no_ws), 0);
        assert_eq!(dispatcher.find_whitespace(&no_ws), 1000);
    }

    struct WidthOf;

    impl SimdOp for WidthOf {
        type Output = usize;

        fn run<P: SimdProcessor>(self, processor: P) -> usize {
            processor.width()
        }
    }

    #[test]
    fn dispatch_selects_matching_width() {
        let dispatcher = Dispatcher::new();
        let width = dispatcher.dispatch(WidthOf);
        let expected = match dispatcher.level() {
            SimdLevel::Scalar => 1,
            SimdLevel::Sse42 | SimdLevel::Neon => 16,
            SimdLevel::Avx2 => 32,
            SimdLevel::Avx512 => 64,
        };
        assert_eq!(width, expected);
    }
}
