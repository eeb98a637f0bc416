use image::{GrayImage, Luma};

use crate::{
    error::Result,
    filters::{color::saturate, gaussian_blur},
    raster::PixelGrid,
    styles::traits::{odd_kernel, positive, StyleMetadata},
    styles::{Style, StyleConfig},
};

use super::{BLUR_KERNEL, DODGE_SCALE};

const DEFAULT_BLUR_KERNEL: i32 = 21;
const DEFAULT_DODGE_SCALE: f32 = 256.0;

/// Pencil-sketch effect
pub struct PencilSketchStyle;

impl PencilSketchStyle {
    pub fn new() -> Self {
        Self
    }

    /// `gray * scale / (255 - blurred_negative)`, with the divisor kept >= 1
    fn dodge(gray: &GrayImage, blurred_negative: &GrayImage, scale: f32) -> GrayImage {
        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let g = gray.get_pixel(x, y)[0] as f32;
            let b = blurred_negative.get_pixel(x, y)[0] as f32;
            let denominator = (255.0 - b).max(1.0);
            Luma([saturate(g * scale / denominator)])
        })
    }
}

impl Style for PencilSketchStyle {
    fn name(&self) -> &str {
        "pencil_sketch"
    }

    fn description(&self) -> &str {
        "Graphite line drawing produced by a grayscale color-dodge blend"
    }

    fn validate_config(&self, config: &StyleConfig) -> Result<()> {
        odd_kernel(config, BLUR_KERNEL, DEFAULT_BLUR_KERNEL, 3)?;
        positive(config, DODGE_SCALE, DEFAULT_DODGE_SCALE)?;
        Ok(())
    }

    fn apply_effect(&self, grid: &PixelGrid, config: &StyleConfig) -> Result<PixelGrid> {
        let kernel = odd_kernel(config, BLUR_KERNEL, DEFAULT_BLUR_KERNEL, 3)?;
        let scale = positive(config, DODGE_SCALE, DEFAULT_DODGE_SCALE)?;

        let gray = grid.to_gray();
        let mut negative = gray.clone();
        image::imageops::invert(&mut negative);
        let blurred_negative = gaussian_blur(&negative, kernel, 0.0);

        let sketch = Self::dodge(&gray, &blurred_negative, scale);
        PixelGrid::from_gray(&sketch)
    }

    fn metadata(&self) -> StyleMetadata {
        StyleMetadata {
            performance_impact: 0.3,
            optional_parameters: vec![
                (BLUR_KERNEL.to_string(), "Odd Gaussian kernel size for the blurred negative (default 21)".to_string()),
                (DODGE_SCALE.to_string(), "Dodge numerator scale; higher whitens more (default 256)".to_string()),
            ],
        }
    }
}
