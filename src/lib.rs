//! # Photo-Stylizer
//!
//! Turn an uploaded photo into a pencil sketch, an oil painting, a modern-art
//! poster or an anime-style drawing.
//!
//! Every transformation is a deterministic pipeline of classic image filters:
//! the bytes are validated and decoded, the image is bounded to a maximum
//! dimension, the selected style runs, and the result is encoded as PNG.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use photo_stylizer::{Config, TransformEngine};
//!
//! # fn main() -> photo_stylizer::Result<()> {
//! let engine = TransformEngine::new(Config::default())?;
//!
//! let photo = std::fs::read("photo.jpg")?;
//! let sketch = engine.transform(&photo, "pencil_sketch")?;
//! std::fs::write("sketch.png", sketch.as_bytes())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`raster`] - Decoding, validation, resizing and PNG encoding
//! - [`filters`] - Filter primitives the styles are built from
//! - [`styles`] - The style pipelines and their dispatcher
//! - [`transform`] - The end-to-end transform engine
//! - [`handler`] - Upload screening, worker pool and result retention
//! - [`config`] - Configuration management
//!
//! ## Creating Custom Styles
//!
//! Additional styles implement the [`Style`](styles::Style) trait and are
//! registered by name:
//!
//! ```rust,no_run
//! use photo_stylizer::raster::PixelGrid;
//! use photo_stylizer::styles::{Style, StyleConfig, StyleMetadata, StyleRegistry};
//! use photo_stylizer::Result;
//!
//! struct Negative;
//!
//! impl Style for Negative {
//!     fn name(&self) -> &str {
//!         "negative"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Inverted colors"
//!     }
//!
//!     fn apply_effect(&self, grid: &PixelGrid, _config: &StyleConfig) -> Result<PixelGrid> {
//!         let mut image = grid.as_image().clone();
//!         image::imageops::invert(&mut image);
//!         PixelGrid::new(image)
//!     }
//!
//!     fn metadata(&self) -> StyleMetadata {
//!         StyleMetadata { performance_impact: 0.1, optional_parameters: vec![] }
//!     }
//! }
//!
//! let mut registry = StyleRegistry::new();
//! registry.register("negative", || Box::new(Negative));
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod handler;
pub mod raster;
pub mod styles;
pub mod transform;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{Result, StylizerError},
    handler::{RequestHandler, Upload},
    raster::{EncodedImage, PixelGrid},
    styles::{Style, StyleId, StyleRegistry},
    transform::{transform, TransformEngine, TransformRequest},
};
