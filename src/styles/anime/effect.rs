use image::RgbImage;
use tracing::debug;

use crate::{
    error::{Result, StyleError},
    filters::{
        adaptive_threshold_mean, and_not_mask, bilateral_filter, canny, quantize, rgb_to_gray,
    },
    raster::PixelGrid,
    styles::traits::{odd_kernel, positive, StyleMetadata},
    styles::{Style, StyleConfig},
};

use super::{BLOCK_SIZE, EDGE_HIGH, EDGE_LOW, QUANTIZE_STEP, THRESHOLD_OFFSET, VARIANT};

const DEFAULT_EDGE_LOW: f32 = 100.0;
const DEFAULT_EDGE_HIGH: f32 = 200.0;
const DEFAULT_BLOCK_SIZE: i32 = 9;
const DEFAULT_THRESHOLD_OFFSET: f32 = 5.0;
const DEFAULT_QUANTIZE_STEP: i32 = 32;

const POSTER_DIAMETER: u32 = 9;
const POSTER_SIGMA: f32 = 250.0;

/// How outlines and color are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimeVariant {
    /// Canny edges stamped black onto the original color
    Outline,
    /// Adaptive-threshold lines stamped black onto smoothed, posterized color
    Poster,
}

impl AnimeVariant {
    fn from_config(config: &StyleConfig) -> Result<Self> {
        match config.get_string_or(VARIANT, "outline") {
            "outline" => Ok(AnimeVariant::Outline),
            "poster" => Ok(AnimeVariant::Poster),
            other => Err(StyleError::InvalidConfig {
                details: format!("{} must be \"outline\" or \"poster\", got \"{}\"", VARIANT, other),
            }
            .into()),
        }
    }
}

/// Anime-style effect
pub struct AnimeStyle;

impl AnimeStyle {
    pub fn new() -> Self {
        Self
    }

    fn outline(&self, rgb: &RgbImage, config: &StyleConfig) -> Result<RgbImage> {
        let low = positive(config, EDGE_LOW, DEFAULT_EDGE_LOW)?;
        let high = positive(config, EDGE_HIGH, DEFAULT_EDGE_HIGH)?;

        let edges = canny(&rgb_to_gray(rgb), low, high);
        Ok(and_not_mask(rgb, &edges)?)
    }

    fn poster(&self, rgb: &RgbImage, config: &StyleConfig) -> Result<RgbImage> {
        let block_size = odd_kernel(config, BLOCK_SIZE, DEFAULT_BLOCK_SIZE, 3)?;
        let offset = config.get_f32_or(THRESHOLD_OFFSET, DEFAULT_THRESHOLD_OFFSET);
        let step = Self::quantize_step(config)?;

        // 0 marks a dark line; flip so lines become the mask to black out.
        let mut lines = adaptive_threshold_mean(&rgb_to_gray(rgb), block_size, offset);
        image::imageops::invert(&mut lines);

        let smoothed = bilateral_filter(rgb, POSTER_DIAMETER, POSTER_SIGMA, POSTER_SIGMA);
        let posterized = quantize(&smoothed, step);
        Ok(and_not_mask(&posterized, &lines)?)
    }

    fn quantize_step(config: &StyleConfig) -> Result<u8> {
        let step = config.get_i32_or(QUANTIZE_STEP, DEFAULT_QUANTIZE_STEP);
        if !(1..=255).contains(&step) {
            return Err(StyleError::InvalidConfig {
                details: format!("{} must be within 1-255, got {}", QUANTIZE_STEP, step),
            }
            .into());
        }
        Ok(step as u8)
    }
}

impl Style for AnimeStyle {
    fn name(&self) -> &str {
        "anime"
    }

    fn description(&self) -> &str {
        "Black ink outlines over flat color"
    }

    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        match AnimeVariant::from_config(config)? {
            AnimeVariant::Outline => {
                let low = positive(config, EDGE_LOW, DEFAULT_EDGE_LOW)?;
                let high = positive(config, EDGE_HIGH, DEFAULT_EDGE_HIGH)?;
                if low > high {
                    return Err(StyleError::InvalidConfig {
                        details: format!("{} ({}) exceeds {} ({})", EDGE_LOW, low, EDGE_HIGH, high),
                    }
                    .into());
                }
            }
            AnimeVariant::Poster => {
                odd_kernel(config, BLOCK_SIZE, DEFAULT_BLOCK_SIZE, 3)?;
                Self::quantize_step(config)?;
            }
        }
        Ok(())
    }

    fn apply_effect(&self, grid: &PixelGrid, config: &StyleConfig) -> Result<PixelGrid> {
        let variant = AnimeVariant::from_config(config)?;
        debug!("Anime variant: {:?}", variant);

        let stylized = match variant {
            AnimeVariant::Outline => self.outline(grid.as_image(), config)?,
            AnimeVariant::Poster => self.poster(grid.as_image(), config)?,
        };
        PixelGrid::new(stylized)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.4,
            optional_parameters: vec![
                (VARIANT.to_string(), "\"outline\" (Canny over original) or \"poster\" (lines over posterized color)".to_string()),
                (EDGE_LOW.to_string(), "Canny low threshold for outline (default 100)".to_string()),
                (EDGE_HIGH.to_string(), "Canny high threshold for outline (default 200)".to_string()),
                (BLOCK_SIZE.to_string(), "Odd neighborhood size for poster line detection (default 9)".to_string()),
                (THRESHOLD_OFFSET.to_string(), "How much darker than its neighborhood a poster line must be (default 5)".to_string()),
                (QUANTIZE_STEP.to_string(), "Poster color quantization step (default 32)".to_string()),
            ],
        }
    }
}
