//! Extraction configuration.
//!
//! [`ExtractionConfig`] is an immutable value handed down the call chain.
//! Nothing in the pipeline reads ambient state, so runs with different
//! thresholds can execute side by side.

use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::parser::{LayoutConfig, TableDetectorConfig};

/// Environment variable for the title font-size threshold.
pub const ENV_TITLE_THRESHOLD: &str = "TITLE_FONT_SIZE_THRESHOLD";
/// Environment variable for the heading font-size threshold.
pub const ENV_HEADING_THRESHOLD: &str = "HEADING_FONT_SIZE_THRESHOLD";
/// Environment variable for the text-layer character threshold.
pub const ENV_TEXT_LAYER_THRESHOLD: &str = "TEXT_LAYER_CHAR_THRESHOLD";
/// Environment variable for the maximum input size in megabytes.
pub const ENV_MAX_FILE_SIZE: &str = "MAX_FILE_SIZE_MB";

/// Process-wide extraction settings, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Font size at or above which a paragraph is a title
    pub title_font_size_threshold: f32,

    /// Font size at or above which a paragraph is a section heading
    pub heading_font_size_threshold: f32,

    /// How far below the heading threshold a bold paragraph may still be promoted
    pub bold_promotion_margin: f32,

    /// Minimum visible characters for a page to count as having a text layer
    pub text_layer_char_threshold: usize,

    /// Maximum accepted input size in megabytes
    pub max_file_size_mb: u64,

    /// Line and paragraph clustering tolerances
    pub layout: LayoutConfig,

    /// Grid detection tolerances
    pub table: TableDetectorConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title_font_size_threshold: 18.0,
            heading_font_size_threshold: 14.0,
            bold_promotion_margin: 1.0,
            text_layer_char_threshold: 1,
            max_file_size_mb: 100,
            layout: LayoutConfig::default(),
            table: TableDetectorConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, ENV_TITLE_THRESHOLD)? {
            config.title_font_size_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_HEADING_THRESHOLD)? {
            config.heading_font_size_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_TEXT_LAYER_THRESHOLD)? {
            config.text_layer_char_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, ENV_MAX_FILE_SIZE)? {
            config.max_file_size_mb = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration contract.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("title threshold", self.title_font_size_threshold),
            ("heading threshold", self.heading_font_size_threshold),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.title_font_size_threshold < self.heading_font_size_threshold {
            return Err(Error::InvalidConfig(format!(
                "title threshold ({}) must not be below heading threshold ({})",
                self.title_font_size_threshold, self.heading_font_size_threshold
            )));
        }

        if !(self.bold_promotion_margin >= 0.0) {
            return Err(Error::InvalidConfig(
                "bold promotion margin must not be negative".to_string(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(Error::InvalidConfig(
                "max file size must be at least 1 MB".to_string(),
            ));
        }

        Ok(())
    }

    /// Maximum accepted input size in bytes.
    pub fn max_file_size_bytes(&self) -> usize {
        let bytes = self.max_file_size_mb.saturating_mul(1024 * 1024);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    /// Set the title threshold.
    pub fn with_title_threshold(mut self, size: f32) -> Self {
        self.title_font_size_threshold = size;
        self
    }

    /// Set the heading threshold.
    pub fn with_heading_threshold(mut self, size: f32) -> Self {
        self.heading_font_size_threshold = size;
        self
    }

    /// Set the bold promotion margin.
    pub fn with_bold_promotion_margin(mut self, margin: f32) -> Self {
        self.bold_promotion_margin = margin;
        self
    }

    /// Set the text-layer character threshold.
    pub fn with_text_layer_threshold(mut self, chars: usize) -> Self {
        self.text_layer_char_threshold = chars;
        self
    }

    /// Set the maximum input size in megabytes.
    pub fn with_max_file_size_mb(mut self, mb: u64) -> Self {
        self.max_file_size_mb = mb;
        self
    }

    /// Set layout tolerances.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set table detection tolerances.
    pub fn with_table(mut self, table: TableDetectorConfig) -> Self {
        self.table = table;
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{}={:?} is not a valid value", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.title_font_size_threshold, 18.0);
        assert_eq!(config.heading_font_size_threshold, 14.0);
        assert_eq!(config.text_layer_char_threshold, 1);
        assert_eq!(config.max_file_size_bytes(), 100 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = ExtractionConfig::from_lookup(lookup(&[
            (ENV_TITLE_THRESHOLD, "20"),
            (ENV_HEADING_THRESHOLD, "15.5"),
            (ENV_MAX_FILE_SIZE, "5"),
        ]))
        .unwrap();
        assert_eq!(config.title_font_size_threshold, 20.0);
        assert_eq!(config.heading_font_size_threshold, 15.5);
        assert_eq!(config.max_file_size_mb, 5);
        assert_eq!(config.text_layer_char_threshold, 1);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = ExtractionConfig::from_lookup(lookup(&[(ENV_TITLE_THRESHOLD, "big")])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_title_below_heading_is_invalid() {
        let config = ExtractionConfig::new()
            .with_title_threshold(12.0)
            .with_heading_threshold(14.0);
        assert!(config.validate().is_err());

        let config = ExtractionConfig::new().with_heading_threshold(0.0);
        assert!(config.validate().is_err());
    }
}
