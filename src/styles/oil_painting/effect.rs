use tracing::debug;

use crate::{
    error::{Result, StyleError},
    filters::{bilateral_filter, median_filter, scale_abs},
    raster::PixelGrid,
    styles::traits::{odd_kernel, positive, StyleMetadata, MAX_KERNEL},
    styles::{Style, StyleConfig},
};

use super::{BRIGHTNESS, CONTRAST, DIAMETER, MEDIAN_KERNEL, SIGMA_COLOR, SIGMA_SPACE};

const DEFAULT_DIAMETER: i32 = 9;
const DEFAULT_SIGMA: f32 = 250.0;
const DEFAULT_CONTRAST: f32 = 1.1;
const DEFAULT_BRIGHTNESS: f32 = 5.0;
const DEFAULT_MEDIAN_KERNEL: i32 = 5;

/// Oil-painting effect
pub struct OilPaintingStyle;

struct Params {
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
    contrast: f32,
    brightness: f32,
    median_kernel: u32,
}

impl OilPaintingStyle {
    pub fn new() -> Self {
        Self
    }

    fn params(config: &StyleConfig) -> Result<Params> {
        let diameter = config.get_i32_or(DIAMETER, DEFAULT_DIAMETER);
        if !(1..=MAX_KERNEL).contains(&diameter) {
            return Err(StyleError::InvalidConfig {
                details: format!("{} must be within 1-{}, got {}", DIAMETER, MAX_KERNEL, diameter),
            }
            .into());
        }

        Ok(Params {
            diameter: diameter as u32,
            sigma_color: positive(config, SIGMA_COLOR, DEFAULT_SIGMA)?,
            sigma_space: positive(config, SIGMA_SPACE, DEFAULT_SIGMA)?,
            contrast: positive(config, CONTRAST, DEFAULT_CONTRAST)?,
            brightness: config.get_f32_or(BRIGHTNESS, DEFAULT_BRIGHTNESS),
            median_kernel: odd_kernel(config, MEDIAN_KERNEL, DEFAULT_MEDIAN_KERNEL, 1)?,
        })
    }
}

impl Style for OilPaintingStyle {
    fn name(&self) -> &str {
        "oil_painting"
    }

    fn description(&self) -> &str {
        "Brush-like patches from heavy edge-preserving smoothing"
    }

    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        Self::params(config).map(|_| ())
    }

    fn apply_effect(&self, grid: &PixelGrid, config: &StyleConfig) -> Result<PixelGrid> {
        let params = Self::params(config)?;
        debug!(
            "Oil painting: bilateral d={} sigma={}/{}, contrast {}+{}, median {}",
            params.diameter,
            params.sigma_color,
            params.sigma_space,
            params.contrast,
            params.brightness,
            params.median_kernel
        );

        let smoothed = bilateral_filter(
            grid.as_image(),
            params.diameter,
            params.sigma_color,
            params.sigma_space,
        );
        let lifted = scale_abs(&smoothed, params.contrast, params.brightness);
        let despeckled = median_filter(&lifted, params.median_kernel);

        PixelGrid::new(despeckled)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.8,
            optional_parameters: vec![
                (DIAMETER.to_string(), "Bilateral window diameter in pixels (default 9)".to_string()),
                (SIGMA_COLOR.to_string(), "Bilateral range sigma (default 250)".to_string()),
                (SIGMA_SPACE.to_string(), "Bilateral spatial sigma (default 250)".to_string()),
                (CONTRAST.to_string(), "Contrast multiplier applied after smoothing (default 1.1)".to_string()),
                (BRIGHTNESS.to_string(), "Brightness offset applied after smoothing (default 5)".to_string()),
                (MEDIAN_KERNEL.to_string(), "Odd median window size; 1 disables (default 5)".to_string()),
            ],
        }
    }
}
