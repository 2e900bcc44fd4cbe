//! sRGB <-> CIE Lab conversion using the 8-bit Lab convention
//! (L scaled to 0..=255, a and b offset by 128), D65 white point.

use crate::{
    error::FilterError,
    raster::{try_filled, LabImage, RasterImage},
};

// D65 reference white
const XN: f32 = 0.950456;
const ZN: f32 = 1.088754;

const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412453, 0.357580, 0.180423],
    [0.212671, 0.715160, 0.072169],
    [0.019334, 0.119193, 0.950227],
];

const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.240479, -1.537150, -0.498535],
    [-0.969256, 1.875991, 0.041556],
    [0.055648, -0.204043, 1.057311],
];

const EPSILON: f32 = 0.008856;
const KAPPA: f32 = 903.3;
const F_OFFSET: f32 = 16.0 / 116.0;
const F_SLOPE: f32 = 7.787;

const L_SCALE: f32 = 255.0 / 100.0;
const CHROMA_OFFSET: f32 = 128.0;

/// Upper bound of every Lab channel in the 8-bit convention
pub const LAB_CHANNEL_MAX: f32 = 255.0;

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        F_SLOPE * t + F_OFFSET
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > EPSILON {
        cube
    } else {
        (f - F_OFFSET) / F_SLOPE
    }
}

fn mul(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn clamp_channel(v: f32) -> f32 {
    v.clamp(0.0, LAB_CHANNEL_MAX)
}

/// Convert one 8-bit RGB pixel to 8-bit-convention Lab
pub fn rgb_to_lab(rgb: [u8; 3]) -> [f32; 3] {
    let linear = rgb.map(|c| srgb_to_linear(c as f32 / 255.0));
    let [x, y, z] = mul(&RGB_TO_XYZ, linear);

    let fx = lab_f(x / XN);
    let fy = lab_f(y);
    let fz = lab_f(z / ZN);

    let l = if y > EPSILON {
        116.0 * fy - 16.0
    } else {
        KAPPA * y
    };

    [
        clamp_channel(l * L_SCALE),
        clamp_channel(500.0 * (fx - fy) + CHROMA_OFFSET),
        clamp_channel(200.0 * (fy - fz) + CHROMA_OFFSET),
    ]
}

/// Convert one 8-bit-convention Lab pixel back to 8-bit RGB
pub fn lab_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    let l = lab[0] / L_SCALE;
    let a = lab[1] - CHROMA_OFFSET;
    let b = lab[2] - CHROMA_OFFSET;

    let y = if l > KAPPA * EPSILON {
        let f = (l + 16.0) / 116.0;
        f * f * f
    } else {
        l / KAPPA
    };
    let fy = lab_f(y);

    let x = lab_f_inv(fy + a / 500.0) * XN;
    let z = lab_f_inv(fy - b / 200.0) * ZN;

    mul(&XYZ_TO_RGB, [x, y, z])
        .map(|c| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Re-express a whole image in Lab
pub(crate) fn to_lab(image: &RasterImage) -> Result<LabImage, FilterError> {
    let mut pixels = try_filled(image.pixel_count(), [0.0f32; 3])?;
    for (lab, rgb) in pixels.iter_mut().zip(image.as_image().pixels()) {
        *lab = rgb_to_lab(rgb.0);
    }
    Ok(LabImage::new(image.width(), image.height(), pixels))
}

/// Shift every pixel's lightness by `offset`, clamped to the channel range
pub(crate) fn boost_lightness(lab: &mut LabImage, offset: f32) {
    for pixel in lab.pixels_mut() {
        pixel[0] = clamp_channel(pixel[0] + offset);
    }
}

/// Convert a Lab image back to 8-bit RGB
pub(crate) fn to_rgb(lab: &LabImage) -> Result<RasterImage, FilterError> {
    let mut data = try_filled(lab.pixels().len() * 3, 0u8)?;
    for (rgb, pixel) in data.chunks_exact_mut(3).zip(lab.pixels()) {
        rgb.copy_from_slice(&lab_to_rgb(*pixel));
    }
    RasterImage::from_raw(lab.width(), lab.height(), 3, data)
}
