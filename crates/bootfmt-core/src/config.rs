//! Environment lookup.
//!
//! Debug gating reads the `debug` variable through an [`Environment`]:
//! - [`ProcessEnv`]: the process environment, with names prefixed
//!   `BOOTFMT_` and upper-cased (`debug` reads `BOOTFMT_DEBUG`).
//! - [`MapEnv`]: an in-memory variable block, as firmware keeps one.

use std::collections::BTreeMap;

/// Prefix applied by [`ProcessEnv`].
pub const ENV_PREFIX: &str = "BOOTFMT_";

/// Variable lookup collaborator.
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    /// Process variable name for `name`.
    #[must_use]
    pub fn var_name(name: &str) -> String {
        format!("{ENV_PREFIX}{}", name.to_ascii_uppercase())
    }
}

impl Environment for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::var_name(name)).ok()
    }
}

/// In-memory variable block.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.vars.remove(name)
    }

    /// Builder form of [`MapEnv::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

impl Environment for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
