//! TOML configuration for the `impot` binary.
//!
//! ```toml
//! parts_policy = "capped"        # or "flat"
//! brackets_file = "brackets.csv" # optional; built-in 2020 scale otherwise
//! log_level = "info"             # default filter, overridden by RUST_LOG
//! log_file = "impot.log"         # optional
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! configuration file.

use std::path::{Path, PathBuf};

use impot_core::{BracketTable, PartsPolicy};
use impot_data::{BracketTableLoader, BracketTableLoaderError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "impot.toml";

/// Errors that can occur while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How dependents are converted into parts.
    pub parts_policy: PartsPolicy,

    /// CSV bracket table; the built-in 2020 scale when absent.
    pub brackets_file: Option<PathBuf>,

    /// Default log filter directive.
    pub log_level: String,

    /// Append log records to this file as well as stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parts_policy: PartsPolicy::default(),
            brackets_file: None,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Parses configuration text. Paths are left as written.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Reads and parses `path`, resolving relative paths against its
    /// parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    /// Loads `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] when it
    /// exists, otherwise the defaults.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            debug!("no {DEFAULT_CONFIG_FILE} found; using defaults");
            Ok(Self::default())
        }
    }

    /// The configured bracket table, or the built-in one.
    pub fn bracket_table(&self) -> Result<BracketTable, BracketTableLoaderError> {
        match &self.brackets_file {
            Some(path) => BracketTableLoader::load_from_file(path),
            None => Ok(BracketTable::france_2020()),
        }
    }

    fn resolve_paths(
        mut self,
        base: &Path,
    ) -> Self {
        self.brackets_file = self.brackets_file.map(|p| base.join(p));
        self.log_file = self.log_file.map(|p| base.join(p));
        self
    }
}
