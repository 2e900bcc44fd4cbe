use crate::{
    error::{Result, StyleError},
    filter::{StyleFilter, DEFAULT_KERNEL_SIZE, DEFAULT_LIGHTNESS_BOOST, MAX_KERNEL_SIZE},
    raster::RasterImage,
    styles::traits::{ParameterInfo, StyleMetadata},
    styles::{Style, StyleConfig},
};

use super::{BLUR_KERNEL_SIZE, LIGHTNESS_BOOST};

/// Brightened, softly blurred look
pub struct GhibliStyle;

impl GhibliStyle {
    pub fn new() -> Self {
        Self
    }

    /// Build the filter described by `config`, rejecting out-of-range values
    fn filter_for(&self, config: &StyleConfig) -> Result<StyleFilter> {
        let boost = config.get_f32_or(LIGHTNESS_BOOST, DEFAULT_LIGHTNESS_BOOST);
        if !boost.is_finite() || !(-255.0..=255.0).contains(&boost) {
            return Err(StyleError::InvalidConfig {
                details: format!("{} must lie in -255..=255, got {}", LIGHTNESS_BOOST, boost),
            }
            .into());
        }

        let kernel = config.get_i32_or(BLUR_KERNEL_SIZE, DEFAULT_KERNEL_SIZE as i32);
        if kernel < 1 || kernel % 2 == 0 || kernel as u32 > MAX_KERNEL_SIZE {
            return Err(StyleError::InvalidConfig {
                details: format!(
                    "{} must be an odd number in 1..={}, got {}",
                    BLUR_KERNEL_SIZE, MAX_KERNEL_SIZE, kernel
                ),
            }
            .into());
        }

        Ok(StyleFilter::new(boost, kernel as u32))
    }
}

impl Default for GhibliStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for GhibliStyle {
    fn name(&self) -> &str {
        "ghibli"
    }

    fn description(&self) -> &str {
        "Soft color grading: lifted lightness in Lab space followed by a gentle 5x5 Gaussian blur"
    }

    fn apply(&self, image: &RasterImage, config: &StyleConfig) -> Result<RasterImage> {
        let filter = self.filter_for(config)?;
        Ok(filter.apply(image)?)
    }

    fn default_config(&self) -> StyleConfig {
        StyleConfig::default()
            .set(LIGHTNESS_BOOST, DEFAULT_LIGHTNESS_BOOST as i32)
            .set(BLUR_KERNEL_SIZE, DEFAULT_KERNEL_SIZE as i32)
    }

    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        self.filter_for(config).map(|_| ())
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            parameters: vec![
                ParameterInfo::new(LIGHTNESS_BOOST, "Lightness offset on the 0-255 Lab scale (default 10)"),
                ParameterInfo::new(BLUR_KERNEL_SIZE, "Odd blur window size in pixels, at most 31 (default 5)"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FilterError, StudioError};

    #[test]
    fn test_default_config_matches_plain_filter() {
        let style = GhibliStyle::new();
        let image = RasterImage::new_filled(5, 5, [90, 140, 60]);

        let styled = style.apply(&image, &style.default_config()).unwrap();
        let filtered = crate::filter::apply(&image).unwrap();
        assert_eq!(styled, filtered);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let style = GhibliStyle::new();
        assert_eq!(
            style.filter_for(&StyleConfig::default()).unwrap(),
            StyleFilter::default()
        );
    }

    #[test]
    fn test_rejects_even_kernel() {
        let style = GhibliStyle::new();
        let config = StyleConfig::default().set(BLUR_KERNEL_SIZE, 4);
        assert!(style.validate_config(&config).is_err());
    }

    #[test]
    fn test_rejects_oversized_kernel() {
        let style = GhibliStyle::new();
        for size in [MAX_KERNEL_SIZE as i32 + 2, 100_001] {
            let config = StyleConfig::default().set(BLUR_KERNEL_SIZE, size);
            let err = style.validate_config(&config).unwrap_err();
            assert!(matches!(err, StudioError::Style(StyleError::InvalidConfig { .. })));
        }
        let widest = StyleConfig::default().set(BLUR_KERNEL_SIZE, MAX_KERNEL_SIZE as i32);
        assert!(style.validate_config(&widest).is_ok());
    }

    #[test]
    fn test_metadata_lists_both_parameters() {
        let names: Vec<_> = GhibliStyle::new()
            .metadata()
            .parameters
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec![LIGHTNESS_BOOST, BLUR_KERNEL_SIZE]);
    }

    #[test]
    fn test_rejects_huge_boost() {
        let style = GhibliStyle::new();
        let config = StyleConfig::default().set(LIGHTNESS_BOOST, 400);
        assert!(style.validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_image_surfaces_filter_error() {
        let style = GhibliStyle::new();
        let image = RasterImage::new(image::RgbImage::new(0, 0));
        let err = style.apply(&image, &StyleConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            StudioError::Filter(FilterError::InvalidInput { .. })
        ));
    }
}
