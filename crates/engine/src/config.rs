//! Database configuration via `larder.toml`
//!
//! On first open of a config path a default `larder.toml` can be written with
//! [`LarderConfig::write_default_if_missing`]. Missing fields take defaults.

use larder_core::{LarderError, LarderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "larder.toml";

/// Largest accepted `initial_capacity`.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Database configuration loaded from `larder.toml`.
///
/// # Example
///
/// ```toml
/// conflict_detection = true
/// initial_capacity = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LarderConfig {
    /// Abort a commit whose reads were overwritten by a concurrent commit.
    #[serde(default = "default_conflict_detection")]
    pub conflict_detection: bool,
    /// Records to pre-allocate in the node and edge maps.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

fn default_conflict_detection() -> bool {
    true
}

fn default_initial_capacity() -> usize {
    1024
}

impl Default for LarderConfig {
    fn default() -> Self {
        Self {
            conflict_detection: default_conflict_detection(),
            initial_capacity: default_initial_capacity(),
        }
    }
}

impl LarderConfig {
    /// Reject out-of-range values.
    pub fn validate(&self) -> LarderResult<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(LarderError::config(format!(
                "initial_capacity {} exceeds maximum {}",
                self.initial_capacity, MAX_INITIAL_CAPACITY
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Larder database configuration
#
# Abort a commit when a record it read was changed by a concurrent commit.
# With false, the last committer silently overwrites (lost updates possible).
conflict_detection = true

# Records to pre-allocate in the node and edge maps.
initial_capacity = 1024
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `LarderError::Config` if the file cannot be read, parsed or
    /// validated.
    pub fn from_file(path: &Path) -> LarderResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LarderError::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: LarderConfig = toml::from_str(&content).map_err(|e| {
            LarderError::config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> LarderResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                LarderError::config(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> LarderResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LarderError::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            LarderError::config(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
