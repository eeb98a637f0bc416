//! # Oil Painting Style Implementation
//!
//! Heavy edge-preserving smoothing followed by a gentle contrast lift and a
//! median pass, so textures flatten into brush-like patches of color.

mod effect;

pub use effect::OilPaintingStyle;

// Oil-painting parameter keys
pub const DIAMETER: &str = "diameter";
pub const SIGMA_COLOR: &str = "sigma_color";
pub const SIGMA_SPACE: &str = "sigma_space";
pub const CONTRAST: &str = "contrast";
pub const BRIGHTNESS: &str = "brightness";
pub const MEDIAN_KERNEL: &str = "median_kernel";
