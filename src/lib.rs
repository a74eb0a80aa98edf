//! # TurLex - SIMD-Accelerated SQL Tokenizer
//!
//! TurLex turns a byte buffer of SQL text into a flat token stream for a
//! downstream parser. The implementation prioritizes:
//!
//! - **Zero-copy tokens**: every token's value borrows from the input
//! - **Runtime SIMD dispatch**: whitespace scanning and keyword matching
//!   use the widest instruction set the host supports (SSE4.2, AVX2,
//!   AVX-512, or NEON), detected once per process
//! - **Totality**: any byte sequence yields a token stream; malformed
//!   input is surfaced as token content, never as an error
//!
//! ## Quick Start
//!
//! ```
//! use turlex::{Tokenizer, TokenKind, Keyword};
//!
//! let sql = b"SELECT id FROM users WHERE active = 1";
//! let mut tokenizer = Tokenizer::new(sql);
//! let tokens = tokenizer.tokenize();
//!
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! assert_eq!(tokens[0].keyword, Keyword::Select);
//! assert_eq!(tokens[1].value, b"id");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │       Tokenizer (state machine)      │
//! ├──────────────────┬──────────────────┤
//! │  Keyword Table   │  Char Classifier │
//! ├──────────────────┴──────────────────┤
//! │       Dispatcher (tier routing)      │
//! ├─────────────────────────────────────┤
//! │  SIMD Kernels (scalar/SSE/AVX/NEON)  │
//! ├─────────────────────────────────────┤
//! │     CPU Detection (one-shot probe)   │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Lifetimes
//!
//! Tokens borrow the input buffer: the buffer must outlive every token
//! retained from a `tokenize` call. Callers that need owned tokens can
//! copy `value` out per token.
//!
//! ## Concurrency
//!
//! `tokenize` is synchronous and runs on the calling thread. Concurrent
//! calls on different buffers need no coordination; the only shared state
//! is the CPU tier (initialized at most once) and the compile-time
//! keyword table.
//!
//! ## Module Overview
//!
//! - [`tokenizer`]: the drive loop and sub-scanners
//! - [`token`]: token kinds and the borrowed token record
//! - [`keywords`]: the 208-entry vocabulary and both lookup paths
//! - [`charclass`]: compile-time byte classification
//! - [`simd`]: CPU detection, per-tier kernels, tier dispatch
//! - [`config`]: centralized tuning constants

pub mod charclass;
pub mod config;
pub mod keywords;
pub mod simd;
pub mod token;
pub mod tokenizer;

pub use keywords::{find_keyword, find_keyword_simd, keyword_name, Keyword};
pub use simd::{CpuDetection, Dispatcher, SimdLevel};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
