use image::imageops::FilterType;
use tracing::debug;

use crate::raster::types::PixelGrid;

/// Caps the longest edge of a grid before stylization
///
/// Every pipeline is at least linear in pixel count with large constant
/// factors (bilateral windows, 21x21 blurs), so this is the main bound on
/// per-request CPU and memory.
#[derive(Debug, Clone, Copy)]
pub struct Resizer {
    max_dimension: u32,
    filter: FilterType,
}

impl Resizer {
    /// Lanczos3 resizer with the given ceiling
    pub fn new(max_dimension: u32) -> Self {
        Self::with_filter(max_dimension, FilterType::Lanczos3)
    }

    pub fn with_filter(max_dimension: u32, filter: FilterType) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
            filter,
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Dimensions a `width x height` image will have after [`Resizer::fit`]
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let longest = width.max(height);
        if longest <= self.max_dimension {
            return (width, height);
        }

        // Integer math floors exactly, where `dim as f64 * scale` can land a hair below.
        let scale = |dim: u32| -> u32 {
            let scaled = dim as u64 * self.max_dimension as u64 / longest as u64;
            (scaled as u32).max(1)
        };

        (scale(width), scale(height))
    }

    /// Downsample when the longest edge exceeds the ceiling, else pass through
    pub fn fit(&self, grid: PixelGrid) -> PixelGrid {
        let (width, height) = grid.dimensions();
        let (target_width, target_height) = self.target_dimensions(width, height);

        if (target_width, target_height) == (width, height) {
            return grid;
        }

        debug!(
            "Resizing {}x{} -> {}x{} ({:?})",
            width, height, target_width, target_height, self.filter
        );

        let resized = image::imageops::resize(grid.as_image(), target_width, target_height, self.filter);

        // Target dimensions are clamped to >= 1, so the buffer is never empty.
        PixelGrid::new(resized).unwrap_or(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_scaled_to_ceiling() {
        let resizer = Resizer::new(1100);
        assert_eq!(resizer.target_dimensions(2000, 1500), (1100, 825));
    }

    #[test]
    fn test_portrait_scaled_to_ceiling() {
        let resizer = Resizer::new(1100);
        assert_eq!(resizer.target_dimensions(1500, 2000), (825, 1100));
    }

    #[test]
    fn test_small_images_untouched() {
        let resizer = Resizer::new(1100);
        assert_eq!(resizer.target_dimensions(1100, 900), (1100, 900));
        assert_eq!(resizer.target_dimensions(10, 10), (10, 10));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        let resizer = Resizer::new(100);
        assert_eq!(resizer.target_dimensions(10_000, 3), (100, 1));
    }

    #[test]
    fn test_fit_resamples_pixels() {
        let grid = PixelGrid::new_filled(300, 150, [200, 10, 10]).unwrap();
        let resized = Resizer::new(100).fit(grid);

        assert_eq!(resized.dimensions(), (100, 50));
        let [r, g, b] = resized.get_pixel(50, 25);
        assert!((r as i32 - 200).abs() <= 2);
        assert!(g <= 12 && b <= 12);
    }

    #[test]
    fn test_fit_is_idempotent() {
        let resizer = Resizer::new(64);
        let grid = PixelGrid::new_filled(200, 90, [30, 60, 90]).unwrap();

        let once = resizer.fit(grid);
        let twice = resizer.fit(once.clone());
        assert_eq!(once, twice);

        let small = PixelGrid::new_filled(20, 10, [1, 1, 1]).unwrap();
        assert_eq!(resizer.fit(small.clone()), small);
    }
}
