// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Incremental, profile-driven tokenizer for syntax highlighting.
//!
//! One generic scanner serves every profile: the keyword and define
//! vocabularies come from the [`ProfileDescriptor`] it borrows. The host
//! editor calls [`Highlighter::tokenize_line`] once per line and threads
//! the returned [`LexerState`] to the next line; `in_string` is the only
//! state that crosses a line boundary (multi-line string literals).
//!
//! Rules are tried in a fixed order and the first match wins. Every
//! character of a line lands in exactly one token: whitespace, bare
//! identifiers, and unrecognized characters come back as
//! [`TokenKind::Plain`] (no styling), so the scanner always advances and
//! never errors.

use crate::profile::ProfileDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comment,
    Str,
    Preprocessor,
    Entrypoint,
    Label,
    Comma,
    Keyword,
    Define,
    Number,
    Plain,
}

/// Scanner state carried across line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerState {
    pub in_string: bool,
}

/// A classified byte span of one line. Spans never overlap and cover the
/// whole line; `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

pub struct Highlighter<'a> {
    profile: &'a ProfileDescriptor,
}

impl<'a> Highlighter<'a> {
    pub fn new(profile: &'a ProfileDescriptor) -> Self {
        Self { profile }
    }

    /// One scan step at `pos`; consumes at least one character.
    pub fn next_token(&self, line: &str, pos: usize, state: &mut LexerState) -> Token {
        let bytes = line.as_bytes();
        debug_assert!(pos < bytes.len());

        // 1. whitespace run, unstyled
        if is_space(bytes[pos]) {
            let mut end = pos + 1;
            while end < bytes.len() && is_space(bytes[end]) {
                end += 1;
            }
            return Token {
                kind: TokenKind::Plain,
                start: pos,
                end,
            };
        }

        // 2. line comment
        if bytes[pos] == b'/' && bytes.get(pos + 1) == Some(&b'/') {
            return Token {
                kind: TokenKind::Comment,
                start: pos,
                end: bytes.len(),
            };
        }

        // 3. string literal, including continuations from earlier lines
        if state.in_string || bytes[pos] == b'"' {
            return scan_string(bytes, pos, state);
        }

        // 4. preprocessor directive
        if bytes[pos] == b'#' {
            if let Some(end) = scan_identifier(bytes, pos + 1) {
                return Token {
                    kind: TokenKind::Preprocessor,
                    start: pos,
                    end,
                };
            }
        }

        // 5. entry-point / label reference
        if bytes[pos] == b'.' {
            if let Some(end) = scan_identifier(bytes, pos + 1) {
                return Token {
                    kind: TokenKind::Entrypoint,
                    start: pos,
                    end,
                };
            }
        }

        // 6. label definition, colon included
        if let Some(end) = scan_identifier(bytes, pos) {
            if bytes.get(end) == Some(&b':') {
                return Token {
                    kind: TokenKind::Label,
                    start: pos,
                    end: end + 1,
                };
            }
        }

        // 7. comma
        if bytes[pos] == b',' {
            return Token {
                kind: TokenKind::Comma,
                start: pos,
                end: pos + 1,
            };
        }

        // 8. command mnemonics, in stored (descending ordinal) order
        if let Some(end) = match_vocabulary(bytes, pos, &self.profile.commands) {
            return Token {
                kind: TokenKind::Keyword,
                start: pos,
                end,
            };
        }

        // 9. define names
        if let Some(end) = match_vocabulary(bytes, pos, &self.profile.defines) {
            return Token {
                kind: TokenKind::Define,
                start: pos,
                end,
            };
        }

        // 10. bare identifier, unstyled
        if bytes[pos].is_ascii_alphabetic() && !prev_is_word(bytes, pos) {
            let mut end = pos + 1;
            while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                end += 1;
            }
            if !next_is_word(bytes, end) {
                return Token {
                    kind: TokenKind::Plain,
                    start: pos,
                    end,
                };
            }
        }

        // 11. standalone numeric literal
        if !prev_is_alnum(bytes, pos) {
            if let Some(end) = match_number(bytes, pos) {
                return Token {
                    kind: TokenKind::Number,
                    start: pos,
                    end,
                };
            }
        }

        // 12. fallback: one character, unstyled
        let width = line[pos..].chars().next().map_or(1, char::len_utf8);
        Token {
            kind: TokenKind::Plain,
            start: pos,
            end: pos + width,
        }
    }

    /// Per-line entry point for the host editor's rendering pipeline.
    pub fn tokenize_line(&self, line: &str, state: &mut LexerState) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        while pos < line.len() {
            let token = self.next_token(line, pos, state);
            debug_assert!(token.end > pos);
            pos = token.end;
            tokens.push(token);
        }
        tokens
    }

    /// Tokenizes a whole document, threading state across line boundaries.
    /// Lines are logical lines without their terminators.
    pub fn tokenize(&self, source: &str) -> Vec<Vec<Token>> {
        let mut state = LexerState::default();
        source
            .lines()
            .map(|line| self.tokenize_line(line, &mut state))
            .collect()
    }
}

fn scan_string(bytes: &[u8], pos: usize, state: &mut LexerState) -> Token {
    let mut cursor = pos;
    if !state.in_string {
        // opening quote
        state.in_string = true;
        cursor += 1;
    }
    match bytes[cursor..].iter().position(|&b| b == b'"') {
        Some(offset) => {
            state.in_string = false;
            Token {
                kind: TokenKind::Str,
                start: pos,
                end: cursor + offset + 1,
            }
        }
        None => Token {
            kind: TokenKind::Str,
            start: pos,
            end: bytes.len(),
        },
    }
}

fn match_vocabulary(bytes: &[u8], pos: usize, entries: &[String]) -> Option<usize> {
    for entry in entries {
        let needle = entry.as_bytes();
        if needle.is_empty() {
            continue;
        }
        let end = pos + needle.len();
        if bytes.len() >= end && &bytes[pos..end] == needle && !next_is_word(bytes, end) {
            return Some(end);
        }
    }
    None
}

fn match_number(bytes: &[u8], pos: usize) -> Option<usize> {
    if let Some(end) = digit_run(bytes, pos) {
        if !next_is_word(bytes, end) {
            return Some(end);
        }
    }
    if let Some(end) = prefixed_run(bytes, pos, b'b', |b| b == b'0' || b == b'1') {
        if !next_is_word(bytes, end) {
            return Some(end);
        }
    }
    if let Some(end) = prefixed_run(bytes, pos, b'x', |b| b.is_ascii_hexdigit()) {
        if !next_is_word(bytes, end) {
            return Some(end);
        }
    }
    None
}

fn digit_run(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut end = pos;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (end > pos).then_some(end)
}

fn prefixed_run(bytes: &[u8], pos: usize, marker: u8, digit: impl Fn(u8) -> bool) -> Option<usize> {
    if bytes.get(pos) != Some(&b'0') || bytes.get(pos + 1) != Some(&marker) {
        return None;
    }
    let mut end = pos + 2;
    while end < bytes.len() && digit(bytes[end]) {
        end += 1;
    }
    (end > pos + 2).then_some(end)
}

fn scan_identifier(bytes: &[u8], pos: usize) -> Option<usize> {
    let first = *bytes.get(pos)?;
    if !first.is_ascii_alphabetic() && first != b'_' {
        return None;
    }
    let mut end = pos + 1;
    while end < bytes.len() && is_word(bytes[end]) {
        end += 1;
    }
    Some(end)
}

fn is_space(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn next_is_word(bytes: &[u8], end: usize) -> bool {
    matches!(bytes.get(end), Some(&b) if is_word(b))
}

fn prev_is_word(bytes: &[u8], pos: usize) -> bool {
    pos > 0 && is_word(bytes[pos - 1])
}

fn prev_is_alnum(bytes: &[u8], pos: usize) -> bool {
    pos > 0 && bytes[pos - 1].is_ascii_alphanumeric()
}
