//! # SQL Tokenizer - Zero-Copy, SIMD-Assisted
//!
//! The tokenizer walks a raw byte buffer and emits a flat token stream
//! with zero string allocation: every token's `value` is a slice of the
//! input. Whitespace between tokens is skipped with the dispatched SIMD
//! kernels; lexeme scanning itself is byte-at-a-time because lexemes are
//! short and position bookkeeping needs per-byte newline checks.
//!
//! ## Token Categories
//!
//! - **Keywords**: vocabulary matches, case-insensitive, with keyword id
//! - **Identifiers**: `[A-Za-z_][A-Za-z0-9_]*` that match no keyword
//! - **Numbers**: `[0-9]+ ('.' [0-9]+)? ([eE] [+-]? [0-9]+)?`, leniently
//!   scanned; the parser validates
//! - **Strings**: single- or double-quoted, doubled-quote escaping, may
//!   span lines; value includes both quote bytes
//! - **Comments**: `--` to end of line, `/* ... */` without nesting
//! - **Operators/Delimiters**: single bytes plus the two-byte set
//!   `<= <> << >= >> != == || && ::`
//!
//! ## Totality
//!
//! Every byte sequence produces a token stream; there is no error path.
//! Unterminated strings and block comments extend to end of input, and
//! stray bytes (control characters, non-ASCII) surface as one-byte
//! `Operator` tokens for the parser to reject.
//!
//! ## End of Stream
//!
//! No `EndOfFile` token is appended: the stream simply ends when the
//! input is exhausted. `TokenKind::EndOfFile` exists for consumers that
//! want a sentinel of their own.
//!
//! ## Reuse
//!
//! A `Tokenizer` is single-shot: `tokenize` consumes the input once and
//! is not reentrant on the same instance. Create one per buffer;
//! construction is two words plus the cached CPU tier.

use crate::charclass::{self, CharClass};
use crate::config::{MAX_KEYWORD_LEN, TOKEN_RESERVE_DIVISOR};
use crate::keywords::{self, Keyword};
use crate::simd::Dispatcher;
use crate::token::{Token, TokenKind};
use memchr::memchr;

pub struct Tokenizer<'a> {
    dispatcher: Dispatcher,
    input: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Name of the SIMD tier driving the whitespace kernels.
    pub fn simd_level(&self) -> &'static str {
        self.dispatcher.level_name()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Tokenizes the entire input. Whitespace tokens are suppressed;
    /// tokens appear in strictly increasing input order.
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity(self.input.len() / TOKEN_RESERVE_DIVISOR);

        while self.pos < self.input.len() {
            let skipped = self.dispatcher.skip_whitespace(&self.input[self.pos..]);
            if skipped > 0 {
                self.advance_over_whitespace(skipped);
            }

            if self.pos >= self.input.len() {
                break;
            }

            let token = self.next_token();
            if token.kind != TokenKind::Whitespace {
                tokens.push(token);
            }
            if token.kind == TokenKind::EndOfFile {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token<'a> {
        if self.pos >= self.input.len() {
            return Token::new(TokenKind::EndOfFile, &[], self.line, self.column);
        }

        let start = self.pos;
        let start_line = self.line;
        let start_column = self.column;
        let first = self.input[self.pos];

        match charclass::classify(first) {
            CharClass::Alpha | CharClass::Underscore => {
                self.scan_identifier_or_keyword(start, start_line, start_column)
            }
            CharClass::Digit => self.scan_number(start, start_line, start_column),
            CharClass::Quote => self.scan_string(start, start_line, start_column, first),
            _ => {
                if first == b'-' && self.peek_at(1) == Some(b'-') {
                    return self.scan_line_comment(start, start_line, start_column);
                }
                if first == b'/' && self.peek_at(1) == Some(b'*') {
                    return self.scan_block_comment(start, start_line, start_column);
                }
                self.scan_operator_or_delimiter(start, start_line, start_column)
            }
        }
    }

    #[inline(always)]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Single-byte advance for bytes that cannot be newlines.
    #[inline(always)]
    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    #[inline(always)]
    fn advance_newline(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.column = 1;
    }

    /// Walks a whitespace run found by the kernel, counting newlines.
    fn advance_over_whitespace(&mut self, count: usize) {
        for _ in 0..count {
            if self.input[self.pos] == b'\n' {
                self.advance_newline();
            } else {
                self.advance();
            }
        }
    }

    fn scan_identifier_or_keyword(
        &mut self,
        start: usize,
        line: u32,
        column: u32,
    ) -> Token<'a> {
        while self.pos < self.input.len() && charclass::is_ident_cont(self.input[self.pos]) {
            self.advance();
        }

        let value = &self.input[start..self.pos];

        let mut keyword = keywords::find_keyword(value);
        if keyword == Keyword::Unknown && value.len() <= MAX_KEYWORD_LEN {
            // Second opinion through the bucket-probing path; both paths
            // agree on the whole vocabulary, so this only matters if the
            // table and buckets ever drift.
            keyword = keywords::find_keyword_simd(&self.dispatcher, value);
        }

        if keyword != Keyword::Unknown {
            Token::with_keyword(TokenKind::Keyword, value, line, column, keyword)
        } else {
            Token::new(TokenKind::Identifier, value, line, column)
        }
    }

    fn scan_number(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        let mut has_dot = false;
        let mut has_exp = false;

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if charclass::is_digit(b) {
                self.advance();
            } else if b == b'.' && !has_dot && !has_exp {
                has_dot = true;
                self.advance();
            } else if (b == b'e' || b == b'E') && !has_exp {
                has_exp = true;
                self.advance();
                if let Some(sign) = self.peek_at(0) {
                    if sign == b'+' || sign == b'-' {
                        self.advance();
                    }
                }
            } else {
                break;
            }
        }

        Token::new(TokenKind::Number, &self.input[start..self.pos], line, column)
    }

    fn scan_string(&mut self, start: usize, line: u32, column: u32, quote: u8) -> Token<'a> {
        self.advance(); // opening quote

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if b == quote {
                if self.peek_at(1) == Some(quote) {
                    // Doubled quote: escaped, not a terminator.
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    break;
                }
            } else if b == b'\n' {
                self.advance_newline();
            } else {
                self.advance();
            }
        }

        // Unterminated strings fall out of the loop at end of input and
        // emit whatever was scanned; the parser spots the missing quote.
        Token::new(TokenKind::String, &self.input[start..self.pos], line, column)
    }

    fn scan_line_comment(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        self.advance(); // '-'
        self.advance(); // '-'

        match memchr(b'\n', &self.input[self.pos..]) {
            Some(offset) => {
                self.pos += offset;
                self.column += offset as u32;
                let value = &self.input[start..self.pos];
                self.advance_newline();
                Token::new(TokenKind::Comment, value, line, column)
            }
            None => {
                let rest = self.input.len() - self.pos;
                self.pos = self.input.len();
                self.column += rest as u32;
                Token::new(TokenKind::Comment, &self.input[start..], line, column)
            }
        }
    }

    fn scan_block_comment(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        self.advance(); // '/'
        self.advance(); // '*'

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if b == b'*' && self.peek_at(1) == Some(b'/') {
                self.advance();
                self.advance();
                break;
            }
            if b == b'\n' {
                self.advance_newline();
            } else {
                self.advance();
            }
        }

        Token::new(TokenKind::Comment, &self.input[start..self.pos], line, column)
    }

    fn scan_operator_or_delimiter(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        let first = self.input[self.pos];
        self.advance();

        let mut kind = if charclass::classify(first) == CharClass::Delimiter {
            TokenKind::Delimiter
        } else {
            TokenKind::Operator
        };

        if let Some(next) = self.peek_at(0) {
            let two_byte = matches!(
                (first, next),
                (b'<', b'=')
                    | (b'<', b'>')
                    | (b'<', b'<')
                    | (b'>', b'=')
                    | (b'>', b'>')
                    | (b'!', b'=')
                    | (b'=', b'=')
                    | (b'|', b'|')
                    | (b'&', b'&')
                    | (b':', b':')
            );
            if two_byte {
                self.advance();
                // '::' starts from a delimiter byte but is an operator.
                kind = TokenKind::Operator;
            }
        }

        Token::new(kind, &self.input[start..self.pos], line, column)
    }
}
