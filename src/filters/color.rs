//! Colorspace conversions and per-pixel tone operations.

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

use crate::error::StyleError;

/// Convert RGB to grayscale using ITU-R BT.601 luma weights
pub fn rgb_to_gray(rgb: &RgbImage) -> GrayImage {
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
        Luma([luma(r, g, b)])
    })
}

/// Replicate a single channel into R, G and B
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        Rgb([v, v, v])
    })
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    saturate(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

/// Round and clamp into the 8-bit range
#[inline]
pub fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Luminance/chrominance planes of an RGB image
#[derive(Debug, Clone)]
pub struct YCrCb {
    pub y: GrayImage,
    pub cr: GrayImage,
    pub cb: GrayImage,
}

const CR_SCALE: f32 = 0.713;
const CB_SCALE: f32 = 0.564;
const CHROMA_DELTA: f32 = 128.0;

/// Split an RGB image into Y, Cr and Cb planes
pub fn rgb_to_ycrcb(rgb: &RgbImage) -> YCrCb {
    let (width, height) = rgb.dimensions();
    let mut y_plane = GrayImage::new(width, height);
    let mut cr_plane = GrayImage::new(width, height);
    let mut cb_plane = GrayImage::new(width, height);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0.map(|c| c as f32);
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        y_plane.put_pixel(x, y, Luma([saturate(luma)]));
        cr_plane.put_pixel(x, y, Luma([saturate((r - luma) * CR_SCALE + CHROMA_DELTA)]));
        cb_plane.put_pixel(x, y, Luma([saturate((b - luma) * CB_SCALE + CHROMA_DELTA)]));
    }

    YCrCb {
        y: y_plane,
        cr: cr_plane,
        cb: cb_plane,
    }
}

/// Recombine Y, Cr and Cb planes into RGB
///
/// Fails when the planes disagree on dimensions.
pub fn ycrcb_to_rgb(planes: &YCrCb) -> Result<RgbImage, StyleError> {
    let dims = planes.y.dimensions();
    if planes.cr.dimensions() != dims || planes.cb.dimensions() != dims {
        return Err(StyleError::EffectFailed {
            effect: "ycrcb_to_rgb".to_string(),
            reason: format!(
                "plane dimensions differ: Y {:?}, Cr {:?}, Cb {:?}",
                dims,
                planes.cr.dimensions(),
                planes.cb.dimensions()
            ),
        });
    }

    Ok(ImageBuffer::from_fn(dims.0, dims.1, |x, y| {
        let luma = planes.y.get_pixel(x, y)[0] as f32;
        let cr = planes.cr.get_pixel(x, y)[0] as f32 - CHROMA_DELTA;
        let cb = planes.cb.get_pixel(x, y)[0] as f32 - CHROMA_DELTA;
        Rgb([
            saturate(luma + 1.403 * cr),
            saturate(luma - 0.714 * cr - 0.344 * cb),
            saturate(luma + 1.773 * cb),
        ])
    }))
}

/// Histogram equalization of a single channel
///
/// A constant image is returned unchanged.
pub fn equalize_histogram(gray: &GrayImage) -> GrayImage {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    let first = match histogram.iter().position(|&count| count > 0) {
        Some(first) => first,
        None => return gray.clone(),
    };
    if histogram[first] == total {
        return gray.clone();
    }

    let scale = 255.0 / (total - histogram[first]) as f64;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u64;
    for level in (first + 1)..256 {
        cumulative += histogram[level];
        lut[level] = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }

    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([lut[gray.get_pixel(x, y)[0] as usize]])
    })
}

/// `saturate(|alpha * v + beta|)` on every channel
pub fn scale_abs(rgb: &RgbImage, alpha: f32, beta: f32) -> RgbImage {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = saturate((alpha * v as f32 + beta).abs());
    }

    let mut out = rgb.clone();
    for value in out.iter_mut() {
        *value = lut[*value as usize];
    }
    out
}

/// Posterize every channel to multiples of `step`
pub fn quantize(rgb: &RgbImage, step: u8) -> RgbImage {
    let step = step.max(1);
    let mut out = rgb.clone();
    for value in out.iter_mut() {
        *value = (*value / step) * step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_of_primaries() {
        let rgb = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([255, 255, 255]),
        });
        let gray = rgb_to_gray(&rgb);
        assert_eq!(gray.get_pixel(0, 0)[0], 76);
        assert_eq!(gray.get_pixel(1, 0)[0], 150);
        assert_eq!(gray.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_ycrcb_roundtrip_close() {
        let rgb = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 200]));
        let back = ycrcb_to_rgb(&rgb_to_ycrcb(&rgb)).unwrap();

        for (a, b) in rgb.iter().zip(back.iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 3, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_ycrcb_rejects_mismatched_planes() {
        let mut planes = rgb_to_ycrcb(&RgbImage::new(4, 4));
        planes.cr = GrayImage::new(3, 4);
        assert!(ycrcb_to_rgb(&planes).is_err());
    }

    #[test]
    fn test_equalize_stretches_range() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([100 + x as u8]));
        let eq = equalize_histogram(&gray);
        let values: Vec<u8> = eq.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_equalize_constant_image_unchanged() {
        let gray = GrayImage::from_pixel(5, 5, Luma([42]));
        assert_eq!(equalize_histogram(&gray), gray);
    }

    #[test]
    fn test_scale_abs_saturates() {
        let rgb = RgbImage::from_pixel(1, 1, Rgb([0, 100, 250]));
        let out = scale_abs(&rgb, 1.2, 10.0);
        assert_eq!(out.get_pixel(0, 0).0, [10, 130, 255]);
    }

    #[test]
    fn test_quantize_floors_to_step() {
        let rgb = RgbImage::from_pixel(1, 1, Rgb([31, 32, 255]));
        assert_eq!(quantize(&rgb, 32).get_pixel(0, 0).0, [0, 32, 224]);
    }
}
