use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    styles::{id::normalize, StyleConfig, StyleId, StyleRegistry},
};

/// Main configuration for photo-stylizer
///
/// Every section has defaults, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upload and size limits
    pub limits: LimitsConfig,

    /// Style selection and per-style parameters
    pub styles: StylesConfig,

    /// Request handler settings
    pub handler: HandlerConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        self.styles.validate()?;
        self.handler.validate()?;
        Ok(())
    }
}

/// Limits applied to every upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted payload in bytes; checked before decoding
    pub max_upload_bytes: usize,

    /// Longest edge, in pixels, an image may have when it reaches a style
    pub max_dimension: u32,

    /// File extensions the handler accepts (lowercase, no dot)
    pub allowed_extensions: Vec<String>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 16 * 1024 * 1024,
            max_dimension: 1100,
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "bmp", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl LimitsConfig {
    /// Whether `filename` carries one of the allowed extensions
    pub fn is_allowed_filename(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() || !ext.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.allowed_extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            }
            _ => false,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_upload_bytes".to_string(),
                value: self.max_upload_bytes.to_string()
            }.into());
        }

        if self.max_dimension == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_dimension".to_string(),
                value: self.max_dimension.to_string()
            }.into());
        }

        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "limits.allowed_extensions".to_string(),
                value: "[]".to_string()
            }.into());
        }

        Ok(())
    }
}

/// Style selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Style used when a request names none, or an unknown one
    pub default_style: String,

    /// Parameter overrides keyed by style name
    pub overrides: HashMap<String, StyleConfig>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            default_style: StyleId::DEFAULT.as_str().to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl StylesConfig {
    /// Parameter overrides for `style`, or an empty set
    ///
    /// Keys match the way style names do, so `Oil-Painting` and
    /// `oil_painting` name the same override.
    pub fn config_for(&self, style: &str) -> StyleConfig {
        let key = normalize(style);
        self.overrides
            .get(&key)
            .or_else(|| {
                self.overrides
                    .iter()
                    .find(|(name, _)| normalize(name) == key)
                    .map(|(_, config)| config)
            })
            .cloned()
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let registry = StyleRegistry::new();

        if !registry.has_style(&self.default_style) {
            return Err(ConfigError::InvalidValue {
                key: "styles.default_style".to_string(),
                value: self.default_style.clone()
            }.into());
        }

        let mut seen = HashMap::new();
        for (name, config) in &self.overrides {
            if let Some(other) = seen.insert(normalize(name), name) {
                return Err(ConfigError::InvalidValue {
                    key: "styles.overrides".to_string(),
                    value: format!("'{}' and '{}' name the same style", other, name)
                }.into());
            }

            let style = registry.get_style(name).ok_or_else(|| ConfigError::InvalidValue {
                key: "styles.overrides".to_string(),
                value: name.clone()
            })?;
            style.validate_config(config)?;
        }

        Ok(())
    }
}

/// Request handler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Number of transforms allowed to run at once
    pub worker_threads: usize,

    /// Seconds a finished result is kept before the sweep removes it
    pub retention_secs: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
            retention_secs: 600,
        }
    }
}

impl HandlerConfig {
    fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "handler.worker_threads".to_string(),
                value: self.worker_threads.to_string()
            }.into());
        }

        Ok(())
    }
}
