//! Configuration management for pagesense
//!
//! Repository-level settings for the parts of the analysis a caller is allowed
//! to tune: the comparison threshold, console noise patterns and the listing
//! item-count trigger. Scoring calibration constants are compiled in and are
//! not part of this file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Repository-level pagesense configuration
///
/// Loaded from `.pagesense/config.toml` in the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSenseConfig {
    /// Visual comparison settings
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Console report filtering
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Signal extraction tuning
    #[serde(default)]
    pub signals: SignalConfig,
}

/// Visual comparison settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Overall diff percentage still considered an expected change
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: f64,
}

/// Console report filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Console entries mentioning any of these substrings are dropped
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

/// Signal extraction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Minimum repeated items for a page to count as a listing
    #[serde(default = "default_many_items_min")]
    pub many_items_min: u64,
}

// Default value providers
fn default_threshold_percent() -> f64 {
    1.0
}

fn default_ignore_patterns() -> Vec<String> {
    vec!["favicon".to_string(), "manifest".to_string()]
}

fn default_many_items_min() -> u64 {
    5
}

impl PageSenseConfig {
    /// Load configuration from `.pagesense/config.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".pagesense/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::PageSenseError::Config(format!("Failed to parse config file: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `.pagesense/config.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_dir = root.join(".pagesense");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default()).map_err(|e| {
            crate::PageSenseError::Config(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Reject values that would make every comparison meaningless
    pub fn validate(&self) -> Result<()> {
        let threshold = self.comparison.threshold_percent;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(crate::PageSenseError::Config(format!(
                "comparison.threshold_percent must be within 0..=100, got {}",
                threshold
            )));
        }
        if self.signals.many_items_min == 0 {
            return Err(crate::PageSenseError::Config(
                "signals.many_items_min must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PageSenseConfig {
    fn default() -> Self {
        Self {
            comparison: ComparisonConfig::default(),
            console: ConsoleConfig::default(),
            signals: SignalConfig::default(),
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            many_items_min: default_many_items_min(),
        }
    }
}
