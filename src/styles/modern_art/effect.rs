use image::RgbImage;
use tracing::warn;

use crate::{
    error::{Result, StyleError},
    filters::{
        add_weighted, bilateral_filter, canny, convolve3x3, equalize_histogram, gray_to_rgb,
        rgb_to_gray, rgb_to_ycrcb, ycrcb_to_rgb, YCrCb, SHARPEN_KERNEL,
    },
    raster::PixelGrid,
    styles::traits::{positive, StyleMetadata},
    styles::{Style, StyleConfig},
};

use super::{BASE_WEIGHT, EDGE_HIGH, EDGE_LOW, EDGE_WEIGHT, SIGMA_COLOR, SIGMA_SPACE};

const SMOOTHING_DIAMETER: u32 = 9;
const DEFAULT_SIGMA: f32 = 75.0;
const DEFAULT_EDGE_LOW: f32 = 100.0;
const DEFAULT_EDGE_HIGH: f32 = 180.0;
const DEFAULT_BASE_WEIGHT: f32 = 0.9;
const DEFAULT_EDGE_WEIGHT: f32 = 0.4;

/// Modern-art effect
///
/// A failing stage never propagates: the original image comes back instead,
/// with a warning logged.
pub struct ModernArtStyle;

struct Params {
    edge_low: f32,
    edge_high: f32,
    base_weight: f32,
    edge_weight: f32,
    sigma_color: f32,
    sigma_space: f32,
}

impl ModernArtStyle {
    pub fn new() -> Self {
        Self
    }

    fn params(config: &StyleConfig) -> Result<Params> {
        let edge_low = positive(config, EDGE_LOW, DEFAULT_EDGE_LOW)?;
        let edge_high = positive(config, EDGE_HIGH, DEFAULT_EDGE_HIGH)?;
        if edge_low > edge_high {
            return Err(StyleError::InvalidConfig {
                details: format!("{} ({}) exceeds {} ({})", EDGE_LOW, edge_low, EDGE_HIGH, edge_high),
            }
            .into());
        }

        let base_weight = config.get_f32_or(BASE_WEIGHT, DEFAULT_BASE_WEIGHT);
        let edge_weight = config.get_f32_or(EDGE_WEIGHT, DEFAULT_EDGE_WEIGHT);
        for (key, weight) in [(BASE_WEIGHT, base_weight), (EDGE_WEIGHT, edge_weight)] {
            if !(0.0..=2.0).contains(&weight) {
                return Err(StyleError::InvalidConfig {
                    details: format!("{} must be within 0.0-2.0, got {}", key, weight),
                }
                .into());
            }
        }

        Ok(Params {
            edge_low,
            edge_high,
            base_weight,
            edge_weight,
            sigma_color: positive(config, SIGMA_COLOR, DEFAULT_SIGMA)?,
            sigma_space: positive(config, SIGMA_SPACE, DEFAULT_SIGMA)?,
        })
    }

    /// Run every stage starting from the image's YCrCb planes
    ///
    /// Only luminance is equalized, so hues are left alone.
    fn stylize(&self, mut planes: YCrCb, params: &Params) -> std::result::Result<RgbImage, StyleError> {
        planes.y = equalize_histogram(&planes.y);
        let equalized = ycrcb_to_rgb(&planes)?;

        let smoothed = bilateral_filter(
            &equalized,
            SMOOTHING_DIAMETER,
            params.sigma_color,
            params.sigma_space,
        );
        let sharpened = convolve3x3(&smoothed, &SHARPEN_KERNEL);

        let edges = canny(&rgb_to_gray(&sharpened), params.edge_low, params.edge_high);
        let edges_rgb = gray_to_rgb(&edges);

        add_weighted(&sharpened, params.base_weight, &edges_rgb, params.edge_weight, 0.0)
    }

    fn render(&self, grid: &PixelGrid, planes: YCrCb, params: &Params) -> Result<PixelGrid> {
        match self.stylize(planes, params) {
            Ok(stylized) => PixelGrid::new(stylized),
            Err(e) => {
                warn!("Modern art stage failed, returning original image: {}", e);
                Ok(grid.clone())
            }
        }
    }
}

impl Style for ModernArtStyle {
    fn name(&self) -> &str {
        "modern_art"
    }

    fn description(&self) -> &str {
        "Equalized, sharpened color with a bright edge overlay"
    }

    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        Self::params(config).map(|_| ())
    }

    fn apply_effect(&self, grid: &PixelGrid, config: &StyleConfig) -> Result<PixelGrid> {
        let params = Self::params(config)?;
        self.render(grid, rgb_to_ycrcb(grid.as_image()), &params)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.7,
            optional_parameters: vec![
                (EDGE_LOW.to_string(), "Canny low threshold (default 100)".to_string()),
                (EDGE_HIGH.to_string(), "Canny high threshold (default 180)".to_string()),
                (BASE_WEIGHT.to_string(), "Weight of the sharpened image in the blend (default 0.9)".to_string()),
                (EDGE_WEIGHT.to_string(), "Weight of the edge overlay in the blend (default 0.4)".to_string()),
                (SIGMA_COLOR.to_string(), "Bilateral range sigma (default 75)".to_string()),
                (SIGMA_SPACE.to_string(), "Bilateral spatial sigma (default 75)".to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_tone(width: u32, height: u32) -> PixelGrid {
        PixelGrid::new(RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 { Rgb([30, 40, 50]) } else { Rgb([220, 200, 180]) }
        }))
        .unwrap()
    }

    #[test]
    fn test_preserves_dimensions() {
        let out = ModernArtStyle::new()
            .apply_effect(&two_tone(40, 30), &StyleConfig::default())
            .unwrap();
        assert_eq!(out.dimensions(), (40, 30));
    }

    #[test]
    fn test_edge_overlay_brightens_boundary() {
        let grid = two_tone(40, 30);
        let out = ModernArtStyle::new().apply_effect(&grid, &StyleConfig::default()).unwrap();

        // Dark side of the boundary carries the edge overlay; far interior does not.
        let boundary = out.get_pixel(19, 15);
        let interior = out.get_pixel(5, 15);
        assert!(boundary[0] > interior[0] + 50, "{:?} vs {:?}", boundary, interior);
    }

    #[test]
    fn test_flat_image_is_only_dimmed() {
        let grid = PixelGrid::new_filled(16, 16, [100, 150, 200]).unwrap();
        let out = ModernArtStyle::new().apply_effect(&grid, &StyleConfig::default()).unwrap();

        // No edges and a constant histogram: only the 0.9 base weight applies.
        let [r, g, b] = out.get_pixel(8, 8);
        let expect = |v: f32| (v * 0.9).round() as i32;
        assert!((r as i32 - expect(100.0)).abs() <= 3);
        assert!((g as i32 - expect(150.0)).abs() <= 3);
        assert!((b as i32 - expect(200.0)).abs() <= 3);
    }

    #[test]
    fn test_failed_stage_returns_original() {
        let grid = two_tone(20, 12);
        let style = ModernArtStyle::new();
        let params = ModernArtStyle::params(&StyleConfig::default()).unwrap();

        let mut planes = rgb_to_ycrcb(grid.as_image());
        planes.cr = image::GrayImage::new(3, 3);

        assert!(style.stylize(planes.clone(), &params).is_err());
        assert_eq!(style.render(&grid, planes, &params).unwrap(), grid);
    }

    #[test]
    fn test_thresholds_out_of_order_rejected() {
        let config = StyleConfig::default().set(EDGE_LOW, 200).set(EDGE_HIGH, 100);
        assert!(ModernArtStyle::new().validate_config(&config).is_err());
    }
}
