/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Loading pyfront.toml.
 */

//! Frontend configuration
//!
//! ```toml
//! [desugar]
//! rules = ["for-loop", "assert"]
//! verify = true
//!
//! [output]
//! show_lines = true
//! ```
//!
//! Every key is optional. Without a `rules` list all built-in rules run.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "pyfront.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontendConfig {
    pub desugar: DesugarConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesugarConfig {
    /// Rule names in priority order. `None` selects every built-in rule.
    pub rules: Option<Vec<String>>,
    /// Check that no rule still matches after desugaring.
    pub verify: bool,
}

impl Default for DesugarConfig {
    fn default() -> Self {
        Self {
            rules: None,
            verify: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Prefix reported errors with their source line.
    pub show_lines: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { show_lines: true }
    }
}

impl FrontendConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load the explicit config file, or `pyfront.toml` in `dir` if it
    /// exists, or fall back to defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "Loading configuration");
            Self::load_from(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
