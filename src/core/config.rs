// src/core/config.rs
//! Engine configuration, loadable from TOML.
//!
//! ```
//! use af_rs::{DegeneratePolicy, EngineConfig};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     normalize_weights = true
//!     degenerate = "error"
//! "#).unwrap();
//!
//! assert!(config.normalize_weights);
//! assert_eq!(config.degenerate, DegeneratePolicy::Error);
//! assert_eq!(config.cross_check_tolerance, 1e-9);
//! ```
//!
//! The poverty cutoff k is not part of configuration: it is supplied on every
//! evaluation, never stored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{AfError, Result};

/// What to return when the population is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// H, A and Mo are all reported as 0.
    #[default]
    Zero,
    /// Fail with `AfError::EmptyPopulation`.
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rescale weights to sum to 1 before computing scores.
    pub normalize_weights: bool,

    pub degenerate: DegeneratePolicy,

    /// Relative tolerance for the Mo == H/100 * A cross-check.
    pub cross_check_tolerance: f64,

    /// Row count at or above which the `parallel` feature partitions rows.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            normalize_weights: false,
            degenerate: DegeneratePolicy::Zero,
            cross_check_tolerance: 1e-9,
            parallel_threshold: 4096,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails `validate`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cross_check_tolerance.is_finite() || self.cross_check_tolerance < 0.0 {
            return Err(AfError::Config(format!(
                "cross_check_tolerance must be a non-negative finite number, got {}.",
                self.cross_check_tolerance
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(AfError::Config(
                "parallel_threshold must be at least 1.".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a population of `n_persons` should be split across threads.
    pub(crate) fn use_parallel(&self, n_persons: usize) -> bool {
        cfg!(feature = "parallel") && n_persons >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() -> Result<()> {
        let config = EngineConfig::from_toml_str("")?;
        assert_eq!(config, EngineConfig::default());
        Ok(())
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let result = EngineConfig::from_toml_str("cross_check_tolerance = -1.0");
        assert!(matches!(result, Err(AfError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = EngineConfig::from_toml_str("cutoff = 0.33");
        assert!(matches!(result, Err(AfError::Toml(_))));
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("af_rs_config_{}.toml", std::process::id()));
        {
            let mut file = std::fs::File::create(&path)?;
            writeln!(file, "parallel_threshold = 10")?;
        }
        let config = EngineConfig::load(&path);
        std::fs::remove_file(&path)?;
        assert_eq!(config?.parallel_threshold, 10);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = EngineConfig::load("/nonexistent/af_rs/engine.toml");
        assert!(matches!(result, Err(AfError::Io(_))));
    }
}
