// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU profile descriptors.
//!
//! A profile descriptor is a relaxed-JSON document describing one target
//! CPU: its instruction patterns, its define/macro names, and the bit width
//! used to render addresses. Loading derives the two highlighting
//! vocabularies from it; the descriptor is immutable afterwards.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

pub mod jsonc;
pub mod registry;

#[derive(Debug)]
pub enum ProfileError {
    Fetch(io::Error),
    Parse(serde_json::Error),
    Malformed(&'static str),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "failed to fetch profile descriptor: {err}"),
            Self::Parse(err) => write!(f, "failed to parse profile descriptor: {err}"),
            Self::Malformed(field) => {
                write!(f, "profile descriptor field missing or mistyped: {field}")
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// Parsed configuration for one target CPU, derived once at load time.
///
/// `commands` and `defines` are stored sorted descending by ordinal
/// comparison; the highlighter tries candidates front to back, so suffix
/// extensions (`jge`) sit ahead of the mnemonics they extend (`jg`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub commands: Vec<String>,
    pub defines: Vec<String>,
    pub addressing_binary_length: u32,
}

impl ProfileDescriptor {
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let stripped = jsonc::strip_line_comments(text);
        let data: Value = serde_json::from_str(&stripped).map_err(ProfileError::Parse)?;
        let cpu = data.get("CPU").ok_or(ProfileError::Malformed("CPU"))?;

        let command_entries = cpu
            .get("COMMANDS")
            .and_then(Value::as_object)
            .ok_or(ProfileError::Malformed("CPU.COMMANDS"))?;
        let mut commands = Vec::with_capacity(command_entries.len());
        for entry in command_entries.values() {
            let pattern = entry
                .get("pattern")
                .and_then(Value::as_str)
                .ok_or(ProfileError::Malformed("CPU.COMMANDS.*.pattern"))?;
            if let Some(mnemonic) = pattern.split_whitespace().next() {
                commands.push(mnemonic.to_string());
            }
        }

        let define_entries = cpu
            .get("DEFINES")
            .and_then(Value::as_object)
            .ok_or(ProfileError::Malformed("CPU.DEFINES"))?;
        let mut defines = Vec::with_capacity(define_entries.len());
        for entry in define_entries.values() {
            let name = match entry {
                Value::String(name) => name.as_str(),
                Value::Array(items) => items
                    .first()
                    .and_then(Value::as_str)
                    .ok_or(ProfileError::Malformed("CPU.DEFINES.*[0]"))?,
                _ => return Err(ProfileError::Malformed("CPU.DEFINES.*")),
            };
            defines.push(name.to_string());
        }

        // The descriptor schema itself spells it "ADRESSING".
        let bin_len = cpu
            .get("ADRESSING")
            .and_then(|addressing| addressing.get("bin_len"))
            .and_then(Value::as_u64)
            .ok_or(ProfileError::Malformed("CPU.ADRESSING.bin_len"))?;

        sort_vocabulary(&mut commands);
        sort_vocabulary(&mut defines);

        Ok(Self {
            commands,
            defines,
            addressing_binary_length: bin_len as u32,
        })
    }
}

fn sort_vocabulary(entries: &mut Vec<String>) {
    entries.sort_unstable_by(|a, b| b.cmp(a));
    entries.dedup();
}

/// Resource-fetch seam: how descriptor text is obtained for a profile name.
pub trait ProfileSource {
    fn fetch(&self, name: &str) -> Result<String, ProfileError>;
}

/// Reads `<root>/<name>.jsonc` from disk.
pub struct DirProfileSource {
    root: PathBuf,
}

impl DirProfileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProfileSource for DirProfileSource {
    fn fetch(&self, name: &str) -> Result<String, ProfileError> {
        let path = self.root.join(format!("{name}.jsonc"));
        fs::read_to_string(path).map_err(ProfileError::Fetch)
    }
}

pub fn load_profile(
    source: &dyn ProfileSource,
    name: &str,
) -> Result<ProfileDescriptor, ProfileError> {
    let text = source.fetch(name)?;
    ProfileDescriptor::parse(&text)
}
