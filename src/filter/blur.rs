use imageproc::filter::separable_filter_equal;

use crate::{error::FilterError, raster::RasterImage};

use super::MAX_KERNEL_SIZE;

/// Standard deviation implied by a kernel size when none is given
pub fn auto_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights for an odd `kernel_size`
///
/// Windows up to 7 taps use the fixed binomial tables (`[1, 4, 6, 4, 1] / 16`
/// for 5), which is what an unspecified sigma resolves to for small kernels.
/// Wider windows sample the Gaussian at [`auto_sigma`] and renormalize.
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    match kernel_size {
        1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => sampled_kernel(kernel_size),
    }
}

fn sampled_kernel(kernel_size: u32) -> Vec<f32> {
    let sigma = auto_sigma(kernel_size);
    let radius = (kernel_size / 2) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i as f32).powi(2) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Separable Gaussian blur applied to each channel independently
///
/// Samples outside the image repeat the nearest edge pixel.
pub(crate) fn gaussian_blur(
    image: &RasterImage,
    kernel_size: u32,
) -> Result<RasterImage, FilterError> {
    if kernel_size == 0 || kernel_size % 2 == 0 || kernel_size > MAX_KERNEL_SIZE {
        return Err(FilterError::InvalidInput {
            reason: format!(
                "blur kernel size must be odd and at most {}, got {}",
                MAX_KERNEL_SIZE, kernel_size
            ),
        });
    }

    let kernel = gaussian_kernel(kernel_size);
    let blurred = separable_filter_equal(image.as_image(), &kernel);
    Ok(RasterImage::new(blurred))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_variance(image: &RasterImage, cx: u32, cy: u32, radius: u32) -> f32 {
        let mut values = Vec::new();
        for y in cy - radius..=cy + radius {
            for x in cx - radius..=cx + radius {
                let p = image.get_pixel(x, y);
                values.push((p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0);
            }
        }
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
    }

    #[test]
    fn test_auto_sigma_for_five_tap_kernel() {
        assert!((auto_sigma(5) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(5);
        assert_eq!(kernel.len(), 5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert_eq!(kernel[0], kernel[4]);
        assert_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_five_tap_kernel_is_binomial() {
        assert_eq!(gaussian_kernel(5), vec![1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0]);
    }

    #[test]
    fn test_wide_kernels_are_sampled() {
        for size in [9, 15, MAX_KERNEL_SIZE] {
            let kernel = gaussian_kernel(size);
            assert_eq!(kernel.len(), size as usize);
            assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
            assert_eq!(kernel[0], kernel[size as usize - 1]);
            assert!(kernel[0] > 0.0);
        }
    }

    #[test]
    fn test_constant_field_is_unchanged() {
        let image = RasterImage::new_filled(6, 4, [37, 120, 250]);
        let blurred = gaussian_blur(&image, 5).unwrap();
        assert_eq!(blurred, image);
    }

    #[test]
    fn test_isolated_pixel_is_smoothed() {
        let mut image = RasterImage::new_filled(9, 9, [0, 0, 0]);
        image.set_pixel(4, 4, [255, 255, 255]);

        let blurred = gaussian_blur(&image, 5).unwrap();

        assert!(local_variance(&blurred, 4, 4, 2) < local_variance(&image, 4, 4, 2));
        let center = blurred.get_pixel(4, 4)[0];
        assert!(center < 255 && center > 0);
        assert!(blurred.get_pixel(3, 4)[0] > 0);
        // Outside the 5x5 footprint nothing moves
        assert_eq!(blurred.get_pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_single_pixel_image() {
        let image = RasterImage::new_filled(1, 1, [9, 8, 7]);
        assert_eq!(gaussian_blur(&image, 5).unwrap(), image);
    }

    #[test]
    fn test_even_kernel_rejected() {
        let image = RasterImage::new_filled(2, 2, [0, 0, 0]);
        assert!(gaussian_blur(&image, 4).is_err());
        assert!(gaussian_blur(&image, 0).is_err());
    }

    #[test]
    fn test_oversized_kernel_rejected() {
        let image = RasterImage::new_filled(2, 2, [0, 0, 0]);
        for size in [MAX_KERNEL_SIZE + 2, 100_001] {
            let err = gaussian_blur(&image, size).unwrap_err();
            assert!(matches!(err, FilterError::InvalidInput { .. }));
        }
        assert!(gaussian_blur(&image, MAX_KERNEL_SIZE).is_ok());
    }
}
