//! # Tokenizer Constants
//!
//! All tuning constants for TurLex live here. Each constant documents the
//! components that depend on it; cross-constant relationships are checked
//! at compile time at the bottom of the file.

/// Number of keyword vocabulary entries.
///
/// The vocabulary is generated from the SQL grammar; the table in
/// `keywords.rs` and the length-bucket index must both cover exactly this
/// many entries.
pub const KEYWORD_COUNT: usize = 208;

/// Maximum byte length of a keyword lexeme.
///
/// Lexemes longer than this are identifiers without any table probe. The
/// AVX2 keyword matcher stages candidate bytes in a 32-byte buffer, so
/// this must never exceed [`AVX2_WIDTH`].
pub const MAX_KEYWORD_LEN: usize = 32;

/// Number of length buckets in the keyword index (lengths 2 through 13).
pub const LENGTH_BUCKET_COUNT: usize = 12;

/// Divisor for the token vector pre-size heuristic.
///
/// `tokenize` reserves `input_len / TOKEN_RESERVE_DIVISOR` slots up front.
/// SQL averages roughly one token per eight bytes, so this avoids most
/// reallocation without over-committing on comment-heavy input.
pub const TOKEN_RESERVE_DIVISOR: usize = 8;

/// Bytes per iteration for the SSE4.2 kernels.
pub const SSE42_WIDTH: usize = 16;

/// Bytes per iteration for the AVX2 kernels.
pub const AVX2_WIDTH: usize = 32;

/// Bytes per iteration for the AVX-512 kernels.
pub const AVX512_WIDTH: usize = 64;

/// Bytes per iteration for the NEON kernels.
pub const NEON_WIDTH: usize = 16;

// The AVX2 keyword matcher copies up to MAX_KEYWORD_LEN lexeme bytes into
// a single 32-byte vector; a longer keyword would silently truncate.
const _: () = assert!(MAX_KEYWORD_LEN <= AVX2_WIDTH);

// The NEON matcher handles keywords up to one vector wide and falls back
// to scalar beyond that; the longest vocabulary entry (13 bytes) must fit.
const _: () = assert!(NEON_WIDTH >= 13);

const _: () = assert!(TOKEN_RESERVE_DIVISOR > 0);

// Tail cascades step down through strictly narrower widths.
const _: () = assert!(AVX512_WIDTH == 2 * AVX2_WIDTH && AVX2_WIDTH == 2 * SSE42_WIDTH);
