//! # Ghibli Studio
//!
//! Turn ordinary photos into soft, bright, hand-painted looking images.
//!
//! The library is a small color-grading pipeline (Lab lightness lift followed
//! by a gentle Gaussian blur) plus the plumbing needed to serve it: a base64
//! image codec, a style registry and a one-endpoint HTTP server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghibli_studio::{config::Config, server::Server, service::TransformService, StyleRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let service = TransformService::from_config(&config, &StyleRegistry::new())?;
//!
//! // POST {"image": "<base64>"} to http://127.0.0.1:5000/api/transform
//! Server::bind(&config.server, service).await?.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`filter`] - the color-grading filter itself
//! - [`raster`] - in-memory RGB images
//! - [`styles`] - named styles wrapping the filter
//! - [`codec`] - base64 / PNG / JPEG conversion
//! - [`service`] - decode, stylize, encode
//! - [`server`] - HTTP surface
//! - [`config`] - configuration management
//!
//! ## Creating Custom Styles
//!
//! ```rust,no_run
//! use ghibli_studio::raster::RasterImage;
//! use ghibli_studio::styles::{Style, StyleConfig};
//! use ghibli_studio::Result;
//!
//! struct Identity;
//!
//! impl Style for Identity {
//!     fn name(&self) -> &str {
//!         "identity"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Returns the image unchanged"
//!     }
//!
//!     fn apply(&self, image: &RasterImage, _config: &StyleConfig) -> Result<RasterImage> {
//!         Ok(image.clone())
//!     }
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod raster;
pub mod server;
pub mod service;
pub mod styles;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{FilterError, Result, StudioError},
    filter::StyleFilter,
    raster::RasterImage,
    service::TransformService,
    styles::{Style, StyleRegistry},
};
