//! # SIMD Kernel Layer
//!
//! Runtime-dispatched SIMD primitives for the tokenizer hot loop. Three
//! operations are implemented once per instruction-set tier:
//!
//! - `find_whitespace`: index of the first whitespace byte
//! - `skip_whitespace`: index of the first non-whitespace byte
//! - `matches_keyword`: ASCII case-insensitive keyword compare with a
//!   word-boundary check
//!
//! ## Tier Selection
//!
//! [`cpu::CpuDetection`] probes the host once and caches the result. The
//! [`dispatch::Dispatcher`] turns that tier into a monomorphized call: the
//! dispatch site is a dense match, not a virtual call, so each kernel
//! inlines into its caller.
//!
//! | Architecture | Tier    | Bytes/iter |
//! |--------------|---------|------------|
//! | x86_64       | AVX-512 | 64         |
//! | x86_64       | AVX2    | 32         |
//! | x86_64       | SSE4.2  | 16         |
//! | aarch64      | NEON    | 16         |
//! | any          | Scalar  | 1          |
//!
//! ## Tail Cascading
//!
//! Buffers shorter than a tier's vector width fall through to the next
//! narrower tier, ending at scalar. Every tier therefore returns results
//! byte-for-byte identical to the scalar reference on any input, aligned
//! or not.

pub mod cpu;
pub mod dispatch;
pub mod scalar;

#[cfg(target_arch = "aarch64")]
pub mod neon;
#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use cpu::{CpuDetection, SimdLevel};
pub use dispatch::{Dispatcher, SimdOp, SimdProcessor};
pub use scalar::ScalarProcessor;

#[cfg(target_arch = "aarch64")]
pub use neon::NeonProcessor;
#[cfg(target_arch = "x86_64")]
pub use x86::{Avx2Processor, Avx512Processor, Sse42Processor};
