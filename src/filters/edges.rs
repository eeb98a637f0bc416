//! Convolution, edge detection and thresholding.

use image::{GrayImage, Luma, RgbImage};
use rayon::prelude::*;

use crate::filters::color::saturate;
use crate::filters::smoothing::box_mean;

/// Center-weighted sharpening kernel (sums to 1)
pub const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

#[inline]
fn clamp_coord(value: i64, len: u32) -> u32 {
    value.clamp(0, len as i64 - 1) as u32
}

/// Convolve each RGB channel with a row-major 3x3 kernel
///
/// Unlike `image::imageops::filter3x3`, the border is filtered too (using
/// replicated edge pixels) instead of being left black.
pub fn convolve3x3(rgb: &RgbImage, kernel: &[f32; 9]) -> RgbImage {
    let (width, height) = rgb.dimensions();
    let row_len = width as usize * 3;
    let mut out = RgbImage::new(width, height);
    let data: &mut [u8] = &mut out;

    data.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width as usize {
            let mut acc = [0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                if *weight == 0.0 {
                    continue;
                }
                let nx = clamp_coord(x as i64 + (k % 3) as i64 - 1, width);
                let ny = clamp_coord(y as i64 + (k / 3) as i64 - 1, height);
                let p = rgb.get_pixel(nx, ny).0;
                for c in 0..3 {
                    acc[c] += p[c] as f32 * weight;
                }
            }
            for c in 0..3 {
                row[x * 3 + c] = saturate(acc[c]);
            }
        }
    });

    out
}

/// Horizontal and vertical 3x3 Sobel derivatives
pub fn sobel(gray: &GrayImage) -> (Vec<i32>, Vec<i32>) {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let at = |x: i64, y: i64| -> i32 {
        gray.get_pixel(clamp_coord(x, width), clamp_coord(y, height))[0] as i32
    };

    let mut gx = vec![0i32; w * height as usize];
    let mut gy = vec![0i32; w * height as usize];

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let idx = y as usize * w + x as usize;
            gx[idx] = (at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x - 1, y) + at(x - 1, y + 1));
            gy[idx] = (at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1))
                - (at(x - 1, y - 1) + 2 * at(x, y - 1) + at(x + 1, y - 1));
        }
    }

    (gx, gy)
}

/// Canny edge detector with hysteresis thresholds on L1 gradient magnitude
///
/// Returns a binary mask: 255 on edges, 0 elsewhere. Thresholds given in the
/// wrong order are swapped.
pub fn canny(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let h = height as usize;

    let (gx, gy) = sobel(gray);
    let magnitude: Vec<i32> = gx.iter().zip(&gy).map(|(a, b)| a.abs() + b.abs()).collect();
    let mag_at = |x: i64, y: i64| -> i32 {
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            0
        } else {
            magnitude[y as usize * w + x as usize]
        }
    };

    // tan(22.5) and tan(67.5) split gradient directions into four sectors.
    const TAN_22_5: f32 = 0.414_213_57;
    const TAN_67_5: f32 = 2.414_213_6;

    let mut strong = Vec::new();
    let mut candidate = vec![false; w * h];

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let idx = y as usize * w + x as usize;
            let m = magnitude[idx];
            if (m as f32) <= low {
                continue;
            }

            let ax = gx[idx].abs() as f32;
            let ay = gy[idx].abs() as f32;
            let is_local_max = if ay < ax * TAN_22_5 {
                m > mag_at(x - 1, y) && m >= mag_at(x + 1, y)
            } else if ay > ax * TAN_67_5 {
                m > mag_at(x, y - 1) && m >= mag_at(x, y + 1)
            } else {
                let s = if (gx[idx] < 0) != (gy[idx] < 0) { -1 } else { 1 };
                m > mag_at(x - s, y - 1) && m > mag_at(x + s, y + 1)
            };

            if !is_local_max {
                continue;
            }
            candidate[idx] = true;
            if (m as f32) > high {
                strong.push(idx);
            }
        }
    }

    let mut edges = GrayImage::new(width, height);
    let mut visited = vec![false; w * h];
    let mut stack = strong;
    for &idx in &stack {
        visited[idx] = true;
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as i64, (idx / w) as i64);
        edges.put_pixel(x as u32, y as u32, Luma([255]));

        for dy in -1..=1 {
            for dx in -1..=1 {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if candidate[n] && !visited[n] {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }
    }

    edges
}

/// Adaptive mean threshold
///
/// A pixel becomes 255 when it is brighter than the mean of its
/// `block_size` neighborhood minus `offset`, otherwise 0. Dark lines therefore
/// come out as 0.
pub fn adaptive_threshold_mean(gray: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let means = box_mean(gray, block_size);
    let w = gray.width() as usize;

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let mean = means[y as usize * w + x as usize].round();
        let value = gray.get_pixel(x, y)[0] as f32;
        Luma([if value > mean - offset { 255 } else { 0 }])
    })
}
