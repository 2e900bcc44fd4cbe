//! # Soft Color-Grading Filter
//!
//! The whole look is four steps run back to back on the calling thread:
//!
//! 1. RGB -> Lab, so lightness can move without shifting hue
//! 2. a uniform lightness lift (`+10` on the 0..=255 lightness scale)
//! 3. Lab -> RGB
//! 4. a small Gaussian blur (5x5, sigma derived from the window)
//!
//! ```rust
//! use ghibli_studio::{filter, raster::RasterImage};
//!
//! let image = RasterImage::new_filled(4, 4, [0, 0, 0]);
//! let graded = filter::apply(&image).unwrap();
//! assert_eq!((graded.width(), graded.height()), (4, 4));
//! ```
//!
//! Every call allocates its own intermediate and output buffers, so separate
//! calls may run on separate threads without coordination.

pub mod blur;
pub mod colour_space;

use tracing::debug;

use crate::{error::FilterError, raster::RasterImage};

/// Lightness offset applied by the default filter
pub const DEFAULT_LIGHTNESS_BOOST: f32 = 10.0;

/// Blur window edge length used by the default filter
pub const DEFAULT_KERNEL_SIZE: u32 = 5;

/// Widest blur window accepted
pub const MAX_KERNEL_SIZE: u32 = 31;

/// Brighten-then-soften filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleFilter {
    /// Offset added to lightness, on the 0..=255 scale
    pub lightness_boost: f32,
    /// Odd blur window edge length up to [`MAX_KERNEL_SIZE`]; 1 disables the blur
    pub kernel_size: u32,
}

impl Default for StyleFilter {
    fn default() -> Self {
        Self {
            lightness_boost: DEFAULT_LIGHTNESS_BOOST,
            kernel_size: DEFAULT_KERNEL_SIZE,
        }
    }
}

impl StyleFilter {
    pub fn new(lightness_boost: f32, kernel_size: u32) -> Self {
        Self {
            lightness_boost,
            kernel_size,
        }
    }

    /// Run the filter, producing a new image of the same size
    pub fn apply(&self, image: &RasterImage) -> Result<RasterImage, FilterError> {
        image.validate()?;

        let mut lab = colour_space::to_lab(image)?;
        colour_space::boost_lightness(&mut lab, self.lightness_boost);
        let graded = colour_space::to_rgb(&lab)?;

        debug!(
            "Graded {}x{} image (lightness {:+}), blurring with {}x{} kernel",
            image.width(),
            image.height(),
            self.lightness_boost,
            self.kernel_size,
            self.kernel_size
        );

        blur::gaussian_blur(&graded, self.kernel_size)
    }

    /// Steps 1-3 only: the brightened image before blurring
    pub fn grade(&self, image: &RasterImage) -> Result<RasterImage, FilterError> {
        image.validate()?;
        let mut lab = colour_space::to_lab(image)?;
        colour_space::boost_lightness(&mut lab, self.lightness_boost);
        colour_space::to_rgb(&lab)
    }
}

/// Apply the default filter
pub fn apply(image: &RasterImage) -> Result<RasterImage, FilterError> {
    StyleFilter::default().apply(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn random_image(rng: &mut SmallRng, width: u32, height: u32) -> RasterImage {
        let data = (0..width * height * 3).map(|_| rng.gen()).collect();
        RasterImage::from_raw(width, height, 3, data).unwrap()
    }

    #[test]
    fn test_dimensions_preserved() {
        let mut rng = SmallRng::seed_from_u64(7);
        for (w, h) in [(1, 1), (1, 9), (13, 2), (32, 17)] {
            let image = random_image(&mut rng, w, h);
            let out = apply(&image).unwrap();
            assert_eq!((out.width(), out.height()), (w, h));
        }
    }

    #[test]
    fn test_input_is_not_modified() {
        let mut rng = SmallRng::seed_from_u64(11);
        let image = random_image(&mut rng, 8, 8);
        let copy = image.clone();
        let _ = apply(&image).unwrap();
        assert_eq!(image, copy);
    }

    #[test]
    fn test_zero_sized_input_rejected() {
        for (w, h) in [(0, 0), (0, 3), (3, 0)] {
            let image = RasterImage::new(RgbImage::new(w, h));
            let err = apply(&image).unwrap_err();
            assert!(matches!(err, FilterError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_zero_boost_grade_is_near_identity() {
        let mut rng = SmallRng::seed_from_u64(3);
        let image = random_image(&mut rng, 16, 16);
        let graded = StyleFilter::new(0.0, 1).grade(&image).unwrap();

        for (a, b) in image.as_raw().iter().zip(graded.as_raw()) {
            assert!((*a as i16 - *b as i16).abs() <= 2);
        }
    }

    #[test]
    fn test_kernel_size_one_skips_blur() {
        let mut rng = SmallRng::seed_from_u64(5);
        let image = random_image(&mut rng, 6, 6);
        let filter = StyleFilter::new(10.0, 1);
        assert_eq!(filter.apply(&image).unwrap(), filter.grade(&image).unwrap());
    }

    #[test]
    fn test_black_image_becomes_uniform_dark_gray() {
        let image = RasterImage::new_filled(4, 4, [0, 0, 0]);
        let out = apply(&image).unwrap();

        assert_eq!((out.width(), out.height()), (4, 4));
        let first = out.get_pixel(0, 0);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get_pixel(x, y), first);
            }
        }
        let max = *first.iter().max().unwrap();
        let min = *first.iter().min().unwrap();
        assert!(max - min <= 1, "expected neutral gray, got {:?}", first);
        assert!((10..=20).contains(&first[1]), "unexpected gray level {:?}", first);
    }

    #[test]
    fn test_single_white_pixel_in_two_by_two() {
        let mut image = RasterImage::new_filled(2, 2, [0, 0, 0]);
        image.set_pixel(0, 0, [255, 255, 255]);

        let filter = StyleFilter::default();
        let graded = filter.grade(&image).unwrap();
        let out = filter.apply(&image).unwrap();

        assert_eq!((out.width(), out.height()), (2, 2));
        assert_eq!(graded.get_pixel(0, 0), [255, 255, 255]);

        let white = out.get_pixel(0, 0)[0];
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let before = graded.get_pixel(x, y);
            let after = out.get_pixel(x, y);
            assert_ne!(before, after, "pixel ({}, {}) untouched by blur", x, y);
            if (x, y) != (0, 0) {
                assert!(after[0] > before[0]);
                assert!(after[0] < white);
            }
        }
        assert!(white < 255);
    }

    #[test]
    fn test_brightening_is_monotonic_on_gray() {
        for v in [0u8, 40, 128, 220, 255] {
            let image = RasterImage::new_filled(3, 3, [v, v, v]);
            let graded = StyleFilter::default().grade(&image).unwrap();
            let before = colour_space::rgb_to_lab(image.get_pixel(1, 1))[0];
            let after = colour_space::rgb_to_lab(graded.get_pixel(1, 1))[0];
            assert!(after + 0.5 >= before, "gray {} darkened", v);
            assert!(after <= colour_space::LAB_CHANNEL_MAX);
        }
    }
}
