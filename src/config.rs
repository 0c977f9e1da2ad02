//! Profiler configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::error::{ProfileError, Result};
use crate::line_timer::DEFAULT_LINE_PADDING;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for a profiling session and its report
///
/// # Example
/// ```
/// use lineprof::config::ProfilerConfig;
///
/// let config = ProfilerConfig::default();
/// assert_eq!(config.line_padding, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfilerConfig {
    /// Extra line slots allocated past the highest line whenever line
    /// storage grows
    pub line_padding: usize,

    /// Rows shown by the text summary
    pub top_lines: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            line_padding: DEFAULT_LINE_PADDING,
            top_lines: 20,
        }
    }
}

impl ProfilerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Example TOML
    /// ```toml
    /// line_padding = 256
    /// top_lines = 10
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ProfileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.line_padding == 0 {
            return Err(ProfileError::Config(
                "line_padding must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
