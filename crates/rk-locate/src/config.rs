//! Configuration
//!
//! Settings are stored as RON. Missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::DEFAULT_TOLERANCE;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Which geometry kernel to materialize against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KernelChoice {
    /// Pure Rust analytic kernel
    #[default]
    Reference,
    /// Truck B-Rep kernel (needs the `truck` feature)
    Truck,
    /// Kernel that rejects every operation
    Null,
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocateConfig {
    /// Kernel backend
    pub kernel: KernelChoice,
    /// Linear tolerance of the reference kernel
    pub tolerance: f64,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            kernel: KernelChoice::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LocateConfig {
    /// Parse from a RON string
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to a pretty RON string
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocateConfig::default();
        assert_eq!(config.kernel, KernelChoice::Reference);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = LocateConfig::from_ron_str("(kernel: Null)").unwrap();
        assert_eq!(config.kernel, KernelChoice::Null);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);

        let config = LocateConfig::from_ron_str("()").unwrap();
        assert_eq!(config, LocateConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            LocateConfig::from_ron_str("(kernel: Opencascade)"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locate.ron");

        let config = LocateConfig {
            kernel: KernelChoice::Truck,
            tolerance: 1e-5,
        };
        config.save(&path).unwrap();

        let loaded = LocateConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocateConfig::load(&dir.path().join("missing.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
