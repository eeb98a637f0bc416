use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{error::Result, raster::PixelGrid};

/// Core trait that all style pipelines must implement
///
/// Implementations are pure: they read the input grid and return a new one,
/// holding no mutable state between calls.
pub trait Style: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Apply the artistic effect to a grid
    ///
    /// # Arguments
    ///
    /// * `grid` - The (already resized) input image
    /// * `config` - Style-specific parameter overrides
    ///
    /// # Returns
    ///
    /// A new grid of the same dimensions, or a [`StyleError`](crate::error::StyleError)
    /// if a stage could not run.
    fn apply_effect(&self, grid: &PixelGrid, config: &StyleConfig) -> Result<PixelGrid>;

    /// Validate that the given configuration is valid for this style
    ///
    /// Called before [`Style::apply_effect`] so parameter mistakes are reported
    /// before any pixel work starts.
    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Get style-specific metadata such as tunable parameters
    fn metadata(&self) -> StyleMetadata {
        StyleMetadata::default()
    }
}

/// Per-style parameter overrides
///
/// Every parameter has a built-in default inside its style; anything set here
/// replaces that default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Style-specific parameters
    #[serde(default)]
    pub parameters: HashMap<String, ConfigValue>,
}

impl StyleConfig {
    /// Set a parameter value
    pub fn set<K: Into<String>, V: Into<ConfigValue>>(mut self, key: K, value: V) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value as a float
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.parameters.get(key).and_then(|v| v.as_f32())
    }

    /// Get a parameter value as an integer
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.parameters.get(key).and_then(|v| v.as_i32())
    }

    /// Get a parameter value as a string
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_string())
    }

    /// Get a parameter value with a default
    pub fn get_f32_or(&self, key: &str, default: f32) -> f32 {
        self.get_f32(key).unwrap_or(default)
    }

    /// Get a parameter value with a default
    pub fn get_i32_or(&self, key: &str, default: i32) -> i32 {
        self.get_i32(key).unwrap_or(default)
    }

    /// Get a parameter value with a default
    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_string(key).unwrap_or(default)
    }
}

/// Flexible configuration value that can hold different types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Integer(i32),
    Float(f32),
    Bool(bool),
    String(String),
}

impl ConfigValue {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::Float(f) if f.fract() == 0.0 => Some(*f as i32),
            _ => None,
        }
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Integer(value)
    }
}

/// Metadata about a style's cost and parameters
#[derive(Debug, Clone, Default)]
pub struct StyleMetadata {
    /// Estimated relative cost (0.0 = minimal, 1.0 = heavy)
    pub performance_impact: f32,

    /// Tunable parameters with descriptions
    pub optional_parameters: Vec<(String, String)>,
}

/// Largest window any style accepts for a kernel, block or diameter
pub(crate) const MAX_KERNEL: i32 = 255;

/// Read an odd kernel size within `min..=MAX_KERNEL` from `config`
pub(crate) fn odd_kernel(config: &StyleConfig, key: &str, default: i32, min: i32) -> Result<u32> {
    let value = config.get_i32_or(key, default);
    if value < min || value > MAX_KERNEL || value % 2 == 0 {
        return Err(crate::error::StyleError::InvalidConfig {
            details: format!(
                "{} must be an odd integer within {}-{}, got {}",
                key, min, MAX_KERNEL, value
            ),
        }
        .into());
    }
    Ok(value as u32)
}

/// Read a strictly positive float from `config`
pub(crate) fn positive(config: &StyleConfig, key: &str, default: f32) -> Result<f32> {
    let value = config.get_f32_or(key, default);
    if !(value.is_finite() && value > 0.0) {
        return Err(crate::error::StyleError::InvalidConfig {
            details: format!("{} must be a positive number, got {}", key, value),
        }
        .into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_getters() {
        let config = StyleConfig::default()
            .set("kernel", 5)
            .set("weight", 0.5f32)
            .set("variant", "poster");

        assert_eq!(config.get_i32("kernel"), Some(5));
        assert_eq!(config.get_f32("kernel"), Some(5.0));
        assert_eq!(config.get_f32("weight"), Some(0.5));
        assert_eq!(config.get_i32("weight"), None);
        assert_eq!(config.get_string_or("variant", "outline"), "poster");
        assert_eq!(config.get_string_or("missing", "outline"), "outline");
    }

    #[test]
    fn test_odd_kernel_validation() {
        assert_eq!(odd_kernel(&StyleConfig::default(), "k", 21, 3).unwrap(), 21);
        assert!(odd_kernel(&StyleConfig::default().set("k", 4), "k", 21, 3).is_err());
        assert!(odd_kernel(&StyleConfig::default().set("k", 1), "k", 21, 3).is_err());
        assert_eq!(odd_kernel(&StyleConfig::default().set("k", MAX_KERNEL), "k", 21, 3).unwrap(), 255);
        assert!(odd_kernel(&StyleConfig::default().set("k", 257), "k", 21, 3).is_err());
        assert!(odd_kernel(&StyleConfig::default().set("k", 65537), "k", 21, 3).is_err());
    }

    #[test]
    fn test_positive_validation() {
        assert!(positive(&StyleConfig::default().set("s", 0.0f32), "s", 1.0).is_err());
        assert!(positive(&StyleConfig::default().set("s", -2.0f32), "s", 1.0).is_err());
        assert_eq!(positive(&StyleConfig::default(), "s", 1.5).unwrap(), 1.5);
    }

    #[test]
    fn test_config_value_from_toml() {
        let config: StyleConfig = toml::from_str(
            r#"
            [parameters]
            blur_kernel = 15
            edge_weight = 0.25
            variant = "poster"
            "#,
        )
        .unwrap();

        assert_eq!(config.get_i32("blur_kernel"), Some(15));
        assert_eq!(config.get_f32("edge_weight"), Some(0.25));
        assert_eq!(config.get_string("variant"), Some("poster"));
    }
}
