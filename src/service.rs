use std::time::Instant;
use tracing::{debug, info};

use crate::{
    codec,
    config::Config,
    error::Result,
    raster::RasterImage,
    styles::{Style, StyleConfig, StyleMetadata, StyleRegistry},
};

/// Turns an encoded upload into an encoded, styled image
///
/// The service follows a fixed pipeline:
/// 1. Decode - base64 payload to an RGB raster
/// 2. Style - run the configured style on the raster
/// 3. Encode - raster to JPEG to base64
///
/// It holds no per-request state, so one instance can be shared by every
/// connection.
pub struct TransformService {
    style: Box<dyn Style>,
    style_config: StyleConfig,
    jpeg_quality: u8,
}

impl TransformService {
    /// Create a new service with the given style and parameters
    pub fn new(style: Box<dyn Style>, style_config: StyleConfig, jpeg_quality: u8) -> Result<Self> {
        style.validate_config(&style_config)?;
        Ok(Self {
            style,
            style_config,
            jpeg_quality,
        })
    }

    /// Build the service described by `config`, resolving the style by name
    pub fn from_config(config: &Config, registry: &StyleRegistry) -> Result<Self> {
        let style = registry.resolve(&config.style.name)?;
        Self::new(style, config.style.config.clone(), config.output.jpeg_quality)
    }

    pub fn style_name(&self) -> &str {
        self.style.name()
    }

    pub fn style_description(&self) -> &str {
        self.style.description()
    }

    pub fn style_metadata(&self) -> StyleMetadata {
        self.style.metadata()
    }

    /// Apply the style to an already decoded image
    pub fn stylize(&self, image: &RasterImage) -> Result<RasterImage> {
        let started = Instant::now();
        let styled = self.style.apply(image, &self.style_config)?;
        debug!(
            "Applied {} style to {}x{} image in {:.1?}",
            self.style.name(),
            image.width(),
            image.height(),
            started.elapsed()
        );
        Ok(styled)
    }

    /// Decode, stylize and re-encode raw image bytes, returning JPEG bytes
    pub fn transform_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let image = codec::decode_bytes(bytes)?;
        let styled = self.stylize(&image)?;
        Ok(codec::encode_jpeg(&styled, self.jpeg_quality)?)
    }

    /// Decode, stylize and re-encode a base64 payload
    pub fn transform_base64(&self, payload: &str) -> Result<String> {
        let started = Instant::now();
        let image = codec::decode_base64(payload)?;
        let styled = self.stylize(&image)?;
        let encoded = codec::encode_base64_jpeg(&styled, self.jpeg_quality)?;

        info!(
            "Transformed {}x{} image in {:.1?}",
            image.width(),
            image.height(),
            started.elapsed()
        );
        Ok(encoded)
    }
}
