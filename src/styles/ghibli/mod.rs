//! # Ghibli Style Implementation
//!
//! Lifts lightness in Lab space and softens the result with a small
//! Gaussian blur, giving a brighter, dreamier, hand-painted feel.

mod effect;

pub use effect::GhibliStyle;

// Ghibli-specific parameter constants
pub const LIGHTNESS_BOOST: &str = "lightness_boost";
pub const BLUR_KERNEL_SIZE: &str = "blur_kernel_size";
