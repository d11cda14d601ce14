//! Configuration system for modeltree.
//!
//! This module provides the configuration structure for the `modeltree`
//! binary with sensible defaults and serde support. Configuration is loaded
//! from a TOML file and merged with command-line arguments.
//!
//! # Example
//!
//! ```
//! use modeltree::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.log_level, "warn");
//! assert_eq!(config.output_format, "text");
//!
//! // Create custom configuration
//! let custom = Config {
//!     output_format: "json".to_string(),
//!     ..Config::default()
//! };
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tree::KindDecl;

/// Configuration for the modeltree binary.
///
/// * `log_level` - tracing filter used when `RUST_LOG` is unset (default: "warn")
/// * `output_format` - "text" or "json" (default: "text")
/// * `default_file` - tree description used when none is given on the command line
/// * `kinds` - extra kind declarations merged into every loaded tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Tracing filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format for query results
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Tree description to load when no file is given
    #[serde(default)]
    pub default_file: Option<PathBuf>,

    /// Kind declarations applied before the description's own
    #[serde(default)]
    pub kinds: Vec<KindDecl>,
}

/// Returns the default log filter.
fn default_log_level() -> String {
    "warn".to_string()
}

/// Returns the default output format.
fn default_output_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_format: default_output_format(),
            default_file: None,
            kinds: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/modeltree/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("modeltree");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {}", err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Returns true if query results should be printed as JSON.
    pub fn wants_json(&self) -> bool {
        self.output_format.eq_ignore_ascii_case("json")
    }
}
