// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Console output surface shared by the profile loader and the compile flow.

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
    Info,
    Plain,
}

impl Severity {
    fn color_code(self) -> Option<&'static str> {
        match self {
            Severity::Error => Some("\x1b[31m"),
            Severity::Success => Some("\x1b[32m"),
            Severity::Info => Some("\x1b[37m"),
            Severity::Plain => None,
        }
    }
}

pub struct Console {
    writer: Box<dyn Write>,
    use_color: bool,
}

impl Console {
    pub fn new(writer: Box<dyn Write>, use_color: bool) -> Self {
        Self { writer, use_color }
    }

    pub fn stdout() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(Box::new(io::stdout()), use_color)
    }

    pub fn line(&mut self, severity: Severity, message: &str) {
        match severity.color_code().filter(|_| self.use_color) {
            Some(code) => {
                let _ = writeln!(self.writer, "{code}{message}\x1b[0m");
            }
            None => {
                let _ = writeln!(self.writer, "{message}");
            }
        }
    }
}
