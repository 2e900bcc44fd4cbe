//! # Raster Images
//!
//! In-memory pixel grids handed to and returned from the filter.

pub mod types;

pub use types::{RasterImage, CHANNELS};
pub(crate) use types::{try_filled, LabImage};
