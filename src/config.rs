use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    error::{ConfigError, Result},
    filter::{DEFAULT_KERNEL_SIZE, DEFAULT_LIGHTNESS_BOOST},
    styles::{
        ghibli::{BLUR_KERNEL_SIZE, LIGHTNESS_BOOST},
        StyleConfig,
    },
};

/// Main configuration for Ghibli Studio
///
/// Every section falls back to its defaults, so a file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Which style to run and how
    pub style: StyleSettings,

    /// Encoding of transformed images
    pub output: OutputConfig,

    /// Settings for the offline batch tool
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.style.validate()?;
        self.output.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// TCP port to listen on
    pub port: u16,

    /// Largest request body accepted, in bytes
    pub max_body_bytes: usize,

    /// Value of the Access-Control-Allow-Origin header
    pub allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: 32 * 1024 * 1024,
            allow_origin: "*".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.host.clone(),
            }
            .into());
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server.max_body_bytes".to_string(),
                value: self.max_body_bytes.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Style selection and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSettings {
    /// Registered style name
    pub name: String,

    /// Parameters handed to the style on every request
    #[serde(flatten)]
    pub config: StyleConfig,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            name: "ghibli".to_string(),
            config: StyleConfig::default()
                .set(LIGHTNESS_BOOST, DEFAULT_LIGHTNESS_BOOST as i32)
                .set(BLUR_KERNEL_SIZE, DEFAULT_KERNEL_SIZE as i32),
        }
    }
}

impl StyleSettings {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "style.name".to_string(),
                value: self.name.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Output encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidValue {
                key: "output.jpeg_quality".to_string(),
                value: self.jpeg_quality.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Batch tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of files processed in parallel
    pub threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.threads".to_string(),
                value: self.threads.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
