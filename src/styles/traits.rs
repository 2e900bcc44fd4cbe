use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{error::Result, raster::RasterImage};

/// Core trait that all image styles must implement
pub trait Style: Send + Sync {
    /// Returns the unique name of this style
    fn name(&self) -> &str;

    /// Returns a human-readable description of this style
    fn description(&self) -> &str;

    /// Produce a styled copy of `image`
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded input; it is never modified
    /// * `config` - Style-specific configuration parameters
    ///
    /// # Returns
    ///
    /// A new image with the same dimensions, or an error if the input or the
    /// configuration cannot be processed.
    fn apply(&self, image: &RasterImage, config: &StyleConfig) -> Result<RasterImage>;

    /// Get the default configuration for this style
    fn default_config(&self) -> StyleConfig {
        StyleConfig::default()
    }

    /// Validate that the given configuration is valid for this style
    ///
    /// Called once at startup so a bad parameter fails fast instead of on
    /// the first request.
    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Describe the parameters this style understands
    fn metadata(&self) -> StyleMetadata {
        StyleMetadata::default()
    }
}

/// Named numeric parameters for a style
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
        self.parameters.get(key).map(|v| v.as_f32())
    }

    /// Get a parameter value as an integer
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.parameters.get(key).map(|v| v.as_i32())
    }

    /// Get a parameter value with a default
    pub fn get_f32_or(&self, key: &str, default: f32) -> f32 {
        self.get_f32(key).unwrap_or(default)
    }

    /// Get a parameter value with a default
    pub fn get_i32_or(&self, key: &str, default: i32) -> i32 {
        self.get_i32(key).unwrap_or(default)
    }
}

/// Numeric configuration value as it appears in TOML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Integer(i32),
    Float(f32),
}

impl ConfigValue {
    pub fn as_f32(&self) -> f32 {
        match self {
            ConfigValue::Integer(i) => *i as f32,
            ConfigValue::Float(f) => *f,
        }
    }

    /// Integers pass through; floats are truncated
    pub fn as_i32(&self) -> i32 {
        match self {
            ConfigValue::Integer(i) => *i,
            ConfigValue::Float(f) => *f as i32,
        }
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Integer(value)
    }
}

/// Metadata about a style's parameters, reported by the health endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMetadata {
    /// Parameters the style reads from its configuration, all optional
    pub parameters: Vec<ParameterInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub description: String,
}

impl ParameterInfo {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, description: D) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
