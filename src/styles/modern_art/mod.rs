//! # Modern Art Style Implementation
//!
//! Luminance equalization, light smoothing, sharpening and a Canny edge
//! overlay. This is also the style requests fall back to when they name an
//! unknown one.

mod effect;

pub use effect::ModernArtStyle;

// Modern-art parameter keys
pub const EDGE_LOW: &str = "edge_low";
pub const EDGE_HIGH: &str = "edge_high";
pub const BASE_WEIGHT: &str = "base_weight";
pub const EDGE_WEIGHT: &str = "edge_weight";
pub const SIGMA_COLOR: &str = "sigma_color";
pub const SIGMA_SPACE: &str = "sigma_space";
