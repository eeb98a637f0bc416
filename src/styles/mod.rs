//! # Style System
//!
//! The four artistic pipelines and the registry that dispatches requests to
//! them. Each style is a stateless [`Style`] that maps a [`PixelGrid`](crate::raster::PixelGrid)
//! to a new grid of the same size.
//!
//! ## Built-in Styles
//!
//! - **Pencil sketch**: grayscale color-dodge line drawing
//! - **Oil painting**: bilateral smoothing, contrast lift, median cleanup
//! - **Modern art**: luminance equalization, sharpening, edge overlay (default)
//! - **Anime**: black outlines over color
//!
//! ## Usage
//!
//! ```rust,no_run
//! use photo_stylizer::raster::PixelGrid;
//! use photo_stylizer::styles::{StyleConfig, StyleRegistry};
//!
//! # fn main() -> photo_stylizer::Result<()> {
//! let registry = StyleRegistry::new();
//! let style = registry.dispatch(Some("pencil_sketch"));
//!
//! let grid = PixelGrid::new_filled(64, 64, [200, 120, 40])?;
//! let sketch = style.apply_effect(&grid, &StyleConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod id;
pub mod registry;
pub mod traits;

// Style implementations
pub mod anime;
pub mod modern_art;
pub mod oil_painting;
pub mod pencil_sketch;

// Re-exports for convenience
pub use id::StyleId;
pub use registry::StyleRegistry;
pub use traits::{ConfigValue, Style, StyleConfig, StyleMetadata};

// Re-export all built-in styles
pub use anime::{AnimeStyle, AnimeVariant};
pub use modern_art::ModernArtStyle;
pub use oil_painting::OilPaintingStyle;
pub use pencil_sketch::PencilSketchStyle;
