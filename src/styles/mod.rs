//! # Style System
//!
//! A style turns one decoded image into a new, styled image. Styles are looked
//! up by name through the [`StyleRegistry`] and tuned with a [`StyleConfig`].
//!
//! ## Built-in Styles
//!
//! - **ghibli**: lifted lightness in Lab space plus a soft 5x5 Gaussian blur
//!
//! ## Usage
//!
//! ```rust
//! use ghibli_studio::raster::RasterImage;
//! use ghibli_studio::styles::StyleRegistry;
//!
//! let registry = StyleRegistry::new();
//! let style = registry.get_style("ghibli").unwrap();
//!
//! let image = RasterImage::new_filled(8, 8, [120, 180, 90]);
//! let styled = style.apply(&image, &style.default_config()).unwrap();
//! assert_eq!(styled.width(), 8);
//! ```

pub mod registry;
pub mod traits;

pub mod ghibli;

pub use registry::StyleRegistry;
pub use traits::{ConfigValue, ParameterInfo, Style, StyleConfig, StyleMetadata};

pub use ghibli::GhibliStyle;
