//! Fuzz testing for the tokenizer.
//!
//! Feeds arbitrary byte sequences to `tokenize` and checks the structural
//! guarantees that hold for any input: no panics, tokens stay inside the
//! buffer in increasing order, only whitespace lands between tokens, and
//! keyword ids appear exactly on keyword tokens.

#![no_main]

use libfuzzer_sys::fuzz_target;

use turlex::{Keyword, TokenKind, Tokenizer};

fuzz_target!(|data: &[u8]| {
    let tokens = Tokenizer::new(data).tokenize();

    let mut cursor = 0usize;
    for token in &tokens {
        let start = token.value.as_ptr() as usize - data.as_ptr() as usize;
        let end = start + token.value.len();

        assert!(end <= data.len());
        assert!(start >= cursor);
        assert!(!token.value.is_empty() || token.kind == TokenKind::EndOfFile);

        for &gap in &data[cursor..start] {
            assert!(matches!(gap, b' ' | b'\t' | b'\n' | b'\r'));
        }

        match token.kind {
            TokenKind::Keyword => assert_ne!(token.keyword, Keyword::Unknown),
            _ => assert_eq!(token.keyword, Keyword::Unknown),
        }
        assert!(!matches!(
            token.kind,
            TokenKind::Whitespace | TokenKind::EndOfFile
        ));

        cursor = end;
    }
});
