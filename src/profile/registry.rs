// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Explicit registry of loaded profiles.
//!
//! All loads happen during a single initialization phase; afterwards the
//! registry is only read. A profile whose load failed is simply absent and
//! its highlighting mode stays unavailable.

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::console::{Console, Severity};
use crate::profile::{load_profile, ProfileDescriptor, ProfileSource};

pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<ProfileDescriptor>>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Loads every named profile in parallel and registers the successes.
    ///
    /// Each load runs to completion on its own thread; there is no
    /// cancellation. Failures are reported on the console and logged, and
    /// the profile is left unregistered.
    pub fn load_all(
        source: &Arc<dyn ProfileSource + Send + Sync>,
        names: &[String],
        console: &mut Console,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        for name in names {
            let source = Arc::clone(source);
            let name = name.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                let result = load_profile(source.as_ref(), &name);
                let _ = tx.send((name, result));
            });
        }
        drop(tx);

        let mut registry = Self::new();
        for (name, result) in rx {
            match result {
                Ok(descriptor) => {
                    log::info!("data for {name} loaded");
                    registry.register(name, descriptor);
                }
                Err(err) => {
                    log::error!("loading profile {name} failed: {err}");
                    console.line(Severity::Error, &format!("{name}: {err}"));
                }
            }
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, descriptor: ProfileDescriptor) {
        self.profiles.insert(name.into(), Arc::new(descriptor));
    }

    pub fn get(&self, name: &str) -> Option<Arc<ProfileDescriptor>> {
        self.profiles.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileError;
    use std::collections::HashMap;
    use std::io;

    struct MapSource {
        entries: HashMap<String, String>,
    }

    impl MapSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.to_string()))
                    .collect(),
            }
        }
    }

    impl ProfileSource for MapSource {
        fn fetch(&self, name: &str) -> Result<String, ProfileError> {
            self.entries.get(name).cloned().ok_or_else(|| {
                ProfileError::Fetch(io::Error::new(io::ErrorKind::NotFound, "no descriptor"))
            })
        }
    }

    const MINIMAL: &str = r#"{"CPU":{
        "COMMANDS":{"a":{"pattern":"mov a, b"}},
        "DEFINES":{"d":"SP"},
        "ADRESSING":{"bin_len":8}
    }}"#;

    fn quiet_console() -> Console {
        Console::new(Box::new(io::sink()), false)
    }

    #[test]
    fn load_all_registers_successes_and_skips_failures() {
        let source: Arc<dyn ProfileSource + Send + Sync> =
            Arc::new(MapSource::new(&[("potados", MINIMAL)]));
        let names = vec!["potados".to_string(), "cpu5".to_string()];
        let registry = ProfileRegistry::load_all(&source, &names, &mut quiet_console());

        assert!(registry.get("potados").is_some());
        assert!(registry.get("cpu5").is_none());
        assert_eq!(registry.names(), vec!["potados"]);
    }

    #[test]
    fn malformed_descriptor_leaves_profile_unregistered() {
        let source: Arc<dyn ProfileSource + Send + Sync> =
            Arc::new(MapSource::new(&[("pm1", r#"{"CPU":{}}"#)]));
        let names = vec!["pm1".to_string()];
        let registry = ProfileRegistry::load_all(&source, &names, &mut quiet_console());
        assert!(registry.get("pm1").is_none());
    }

    #[test]
    fn register_overwrites_idempotently() {
        let mut registry = ProfileRegistry::new();
        let first = ProfileDescriptor::parse(MINIMAL).expect("parses");
        let second = ProfileDescriptor {
            addressing_binary_length: 16,
            ..first.clone()
        };
        registry.register("potados", first);
        registry.register("potados", second);
        let stored = registry.get("potados").expect("registered");
        assert_eq!(stored.addressing_binary_length, 16);
        assert_eq!(registry.names().len(), 1);
    }
}
