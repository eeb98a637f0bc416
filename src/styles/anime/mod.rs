//! # Anime Style Implementation
//!
//! Black ink outlines over color. Two compositions are available:
//!
//! - `outline` (default): Canny edges stamped onto the untouched original
//! - `poster`: adaptive-threshold line art stamped onto smoothed, posterized color

mod effect;

pub use effect::{AnimeStyle, AnimeVariant};

// Anime parameter keys
pub const VARIANT: &str = "variant";
pub const EDGE_LOW: &str = "edge_low";
pub const EDGE_HIGH: &str = "edge_high";
pub const BLOCK_SIZE: &str = "block_size";
pub const THRESHOLD_OFFSET: &str = "threshold_offset";
pub const QUANTIZE_STEP: &str = "quantize_step";
