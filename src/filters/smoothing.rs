//! Blur and edge-preserving smoothing filters.
//!
//! All filters replicate the border pixel when a window runs off the image and
//! parallelize over output rows with rayon.

use image::{GrayImage, RgbImage};
use rayon::prelude::*;

use crate::filters::color::saturate;

#[inline]
fn clamp_coord(value: i64, len: u32) -> u32 {
    value.clamp(0, len as i64 - 1) as u32
}

/// Sigma used for a Gaussian kernel of `size` taps when none is given
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as i32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in kernel.iter_mut() {
        *weight /= sum;
    }
    kernel
}

/// Separable Gaussian blur with an explicit odd kernel size
///
/// A non-positive `sigma` is derived from the kernel size.
pub fn gaussian_blur(gray: &GrayImage, kernel_size: u32, sigma: f32) -> GrayImage {
    let size = kernel_size.max(1) | 1;
    let sigma = if sigma > 0.0 { sigma } else { sigma_for_kernel(size) };
    let kernel = gaussian_kernel(size, sigma);
    let radius = (size / 2) as i64;
    let (width, height) = gray.dimensions();
    let src = gray.as_raw();
    let w = width as usize;

    let mut horizontal = vec![0f32; w * height as usize];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &src[y * w..(y + 1) * w];
            for (x, out) in row.iter_mut().enumerate() {
                *out = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| {
                        let sx = clamp_coord(x as i64 + k as i64 - radius, width);
                        line[sx as usize] as f32 * weight
                    })
                    .sum();
            }
        });

    let mut out = GrayImage::new(width, height);
    let data: &mut [u8] = &mut out;
    data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, value) in row.iter_mut().enumerate() {
            let acc: f32 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sy = clamp_coord(y as i64 + k as i64 - radius, height) as usize;
                    horizontal[sy * w + x] * weight
                })
                .sum();
            *value = saturate(acc);
        }
    });

    out
}

/// Bilateral filter over RGB
///
/// `diameter` bounds a circular spatial window. Range weights use the L1
/// distance between the center and neighbor colors, so strong color edges keep
/// their sharpness while flat regions are averaged.
pub fn bilateral_filter(
    rgb: &RgbImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> RgbImage {
    let sigma_color = if sigma_color > 0.0 { sigma_color } else { 1.0 };
    let sigma_space = if sigma_space > 0.0 { sigma_space } else { 1.0 };
    let radius = if diameter == 0 {
        (sigma_space * 1.5).round().max(1.0) as i64
    } else {
        (diameter / 2).max(1) as i64
    };

    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    let mut offsets = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = (dx * dx + dy * dy) as f32;
            if dist_sq.sqrt() > radius as f32 {
                continue;
            }
            offsets.push((dx, dy, (dist_sq * space_coeff).exp()));
        }
    }

    let color_weights: Vec<f32> = (0..=255 * 3)
        .map(|d: i32| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let (width, height) = rgb.dimensions();
    let row_len = width as usize * 3;
    let mut out = RgbImage::new(width, height);
    let data: &mut [u8] = &mut out;

    data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width as usize {
            let center = rgb.get_pixel(x as u32, y as u32).0;
            let mut sum = [0f32; 3];
            let mut weight_sum = 0f32;

            for &(dx, dy, space_weight) in &offsets {
                let nx = clamp_coord(x as i64 + dx, width);
                let ny = clamp_coord(y as i64 + dy, height);
                let neighbor = rgb.get_pixel(nx, ny).0;

                let diff: i32 = (0..3)
                    .map(|c| (neighbor[c] as i32 - center[c] as i32).abs())
                    .sum();
                let weight = space_weight * color_weights[diff as usize];

                for c in 0..3 {
                    sum[c] += neighbor[c] as f32 * weight;
                }
                weight_sum += weight;
            }

            let px = &mut row[x * 3..x * 3 + 3];
            if weight_sum > 0.0 {
                for c in 0..3 {
                    px[c] = saturate(sum[c] / weight_sum);
                }
            } else {
                px.copy_from_slice(&center);
            }
        }
    });

    out
}

/// Per-channel median filter with an odd square window
pub fn median_filter(rgb: &RgbImage, kernel_size: u32) -> RgbImage {
    let size = kernel_size.max(1) | 1;
    if size == 1 {
        return rgb.clone();
    }
    let radius = (size / 2) as i64;
    let (width, height) = rgb.dimensions();
    let row_len = width as usize * 3;
    let mut out = RgbImage::new(width, height);
    let data: &mut [u8] = &mut out;

    data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let mut window: [Vec<u8>; 3] = Default::default();
        for x in 0..width as usize {
            for channel in window.iter_mut() {
                channel.clear();
            }
            for dy in -radius..=radius {
                let ny = clamp_coord(y as i64 + dy, height);
                for dx in -radius..=radius {
                    let nx = clamp_coord(x as i64 + dx, width);
                    let p = rgb.get_pixel(nx, ny).0;
                    for c in 0..3 {
                        window[c].push(p[c]);
                    }
                }
            }
            for c in 0..3 {
                let mid = window[c].len() / 2;
                let (_, median, _) = window[c].select_nth_unstable(mid);
                row[x * 3 + c] = *median;
            }
        }
    });

    out
}

/// Mean of each pixel's `block_size x block_size` neighborhood
pub fn box_mean(gray: &GrayImage, block_size: u32) -> Vec<f32> {
    let size = block_size.max(1) | 1;
    let radius = (size / 2) as i64;
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let src = gray.as_raw();

    let mut horizontal = vec![0f32; w * height as usize];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = (-radius..=radius)
                    .map(|d| src[y * w + clamp_coord(x as i64 + d, width) as usize] as f32)
                    .sum();
            }
        });

    let area = size as f32 * size as f32;
    let mut means = vec![0f32; w * height as usize];
    means.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let sum: f32 = (-radius..=radius)
                .map(|d| horizontal[clamp_coord(y as i64 + d, height) as usize * w + x])
                .sum();
            *out = sum / area;
        }
    });

    means
}
