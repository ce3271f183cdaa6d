// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Terminal rendering of highlighted source.
//!
//! Consumes the per-line token stream the way a host editor would: splices
//! ANSI style codes around styled spans and passes everything else through
//! untouched, so with color off the rendered text equals the input.

use crate::highlight::{Highlighter, LexerState, Token, TokenKind};
use crate::profile::ProfileDescriptor;

fn style_code(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Comment => Some("\x1b[90m"),
        TokenKind::Str => Some("\x1b[33m"),
        TokenKind::Preprocessor => Some("\x1b[35m"),
        TokenKind::Entrypoint => Some("\x1b[36m"),
        TokenKind::Label => Some("\x1b[32m"),
        TokenKind::Comma => Some("\x1b[37m"),
        TokenKind::Keyword => Some("\x1b[95m"),
        TokenKind::Define => Some("\x1b[94m"),
        TokenKind::Number => Some("\x1b[93m"),
        TokenKind::Plain => None,
    }
}

pub fn render_line(line: &str, tokens: &[Token], use_color: bool) -> String {
    let mut out = String::with_capacity(line.len());
    for token in tokens {
        let text = &line[token.start..token.end];
        match style_code(token.kind).filter(|_| use_color) {
            Some(code) => {
                out.push_str(code);
                out.push_str(text);
                out.push_str("\x1b[0m");
            }
            None => out.push_str(text),
        }
    }
    out
}

pub fn render_document(profile: &ProfileDescriptor, source: &str, use_color: bool) -> String {
    let highlighter = Highlighter::new(profile);
    let mut state = LexerState::default();
    let rendered: Vec<String> = source
        .split('\n')
        .map(|line| {
            let tokens = highlighter.tokenize_line(line, &mut state);
            render_line(line, &tokens, use_color)
        })
        .collect();
    rendered.join("\n")
}
