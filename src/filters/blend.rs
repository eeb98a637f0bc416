//! Pixel-wise combination of two images.

use image::{GrayImage, RgbImage};

use crate::error::StyleError;
use crate::filters::color::saturate;

fn ensure_same_size(op: &str, a: (u32, u32), b: (u32, u32)) -> Result<(), StyleError> {
    if a != b {
        return Err(StyleError::EffectFailed {
            effect: op.to_string(),
            reason: format!("dimension mismatch: {:?} vs {:?}", a, b),
        });
    }
    Ok(())
}

/// `saturate(a * alpha + b * beta + gamma)` per channel
pub fn add_weighted(
    a: &RgbImage,
    alpha: f32,
    b: &RgbImage,
    beta: f32,
    gamma: f32,
) -> Result<RgbImage, StyleError> {
    ensure_same_size("add_weighted", a.dimensions(), b.dimensions())?;

    let mut out = a.clone();
    for (dst, src) in out.iter_mut().zip(b.iter()) {
        *dst = saturate(*dst as f32 * alpha + *src as f32 * beta + gamma);
    }
    Ok(out)
}

/// Bitwise AND of every channel with the complement of `mask`
///
/// With a binary 0/255 mask this blacks out masked pixels and leaves the rest
/// untouched.
pub fn and_not_mask(rgb: &RgbImage, mask: &GrayImage) -> Result<RgbImage, StyleError> {
    ensure_same_size("and_not_mask", rgb.dimensions(), mask.dimensions())?;

    let mut out = rgb.clone();
    for (px, m) in out.chunks_exact_mut(3).zip(mask.iter()) {
        for channel in px.iter_mut() {
            *channel &= !*m;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_add_weighted_saturates() {
        let a = RgbImage::from_pixel(2, 2, Rgb([200, 100, 0]));
        let b = RgbImage::from_pixel(2, 2, Rgb([255, 255, 0]));
        let out = add_weighted(&a, 0.9, &b, 0.4, 0.0).unwrap();
        assert_eq!(out.get_pixel(1, 1).0, [255, 192, 0]);
    }

    #[test]
    fn test_add_weighted_size_mismatch() {
        let a = RgbImage::new(2, 2);
        let b = RgbImage::new(3, 2);
        assert!(add_weighted(&a, 1.0, &b, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_and_not_mask_blacks_out_edges() {
        let rgb = RgbImage::from_pixel(2, 1, Rgb([90, 180, 255]));
        let mask = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 255 } else { 0 }]));
        let out = and_not_mask(&rgb, &mask).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [90, 180, 255]);
    }
}
