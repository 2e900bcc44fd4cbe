//! Conversion between base64-encoded compressed images and [`RasterImage`]s.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, ColorType};
use tracing::debug;

use crate::{error::CodecError, raster::RasterImage};

/// Strip an optional `data:<mime>;base64,` prefix and surrounding whitespace
fn strip_data_url(payload: &str) -> &str {
    let payload = payload.trim();
    match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(rest),
        None => payload,
    }
}

/// Decode compressed image bytes (PNG, JPEG) to RGB
///
/// Alpha is dropped and grayscale expanded so the result always has three
/// channels.
pub fn decode_bytes(bytes: &[u8]) -> Result<RasterImage, CodecError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| CodecError::DecodeFailed {
        reason: e.to_string(),
    })?;
    debug!(
        "Decoded {}x{} image ({:?})",
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(RasterImage::new(decoded.to_rgb8()))
}

/// Decode a base64 payload into a raster image
pub fn decode_base64(payload: &str) -> Result<RasterImage, CodecError> {
    let bytes = STANDARD
        .decode(strip_data_url(payload))
        .map_err(|e| CodecError::InvalidBase64 {
            reason: e.to_string(),
        })?;
    decode_bytes(&bytes)
}

/// Compress an image as JPEG
pub fn encode_jpeg(image: &RasterImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
    encoder
        .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .map_err(|e| CodecError::EncodeFailed {
            reason: e.to_string(),
        })?;
    Ok(bytes)
}

/// Compress an image as JPEG and wrap it in base64
pub fn encode_base64_jpeg(image: &RasterImage, quality: u8) -> Result<String, CodecError> {
    Ok(STANDARD.encode(encode_jpeg(image, quality)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{codecs::png::PngEncoder, ImageEncoder};

    fn png_bytes(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(data, width, height, color)
            .unwrap();
        bytes
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("  abcd \n"), "abcd");
        assert_eq!(strip_data_url("data:image/png;base64,abcd"), "abcd");
    }

    #[test]
    fn test_decode_png_payload() {
        let png = png_bytes(2, 1, ColorType::Rgb8, &[255, 0, 0, 0, 0, 255]);
        let payload = STANDARD.encode(png);

        let image = decode_base64(&payload).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        assert_eq!(image.get_pixel(0, 0), [255, 0, 0]);
        assert_eq!(image.get_pixel(1, 0), [0, 0, 255]);
    }

    #[test]
    fn test_decode_drops_alpha() {
        let png = png_bytes(1, 1, ColorType::Rgba8, &[10, 20, 30, 0]);
        let image = decode_bytes(&png).unwrap();
        assert_eq!(image.get_pixel(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_decode_with_data_url_prefix() {
        let png = png_bytes(1, 1, ColorType::L8, &[77]);
        let payload = format!("data:image/png;base64,{}", STANDARD.encode(png));
        let image = decode_base64(&payload).unwrap();
        assert_eq!(image.get_pixel(0, 0), [77, 77, 77]);
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(matches!(
            decode_base64("not base64!!"),
            Err(CodecError::InvalidBase64 { .. })
        ));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let payload = STANDARD.encode(b"definitely not an image");
        assert!(matches!(
            decode_base64(&payload),
            Err(CodecError::DecodeFailed { .. })
        ));
    }

    #[test]
    fn test_jpeg_output_decodes_to_same_size() {
        let image = RasterImage::new_filled(9, 5, [200, 120, 40]);
        let payload = encode_base64_jpeg(&image, 75).unwrap();
        let back = decode_base64(&payload).unwrap();
        assert_eq!((back.width(), back.height()), (9, 5));
    }
}
