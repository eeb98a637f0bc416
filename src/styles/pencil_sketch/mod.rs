//! # Pencil Sketch Style Implementation
//!
//! Grayscale "color dodge" of an image against a blurred copy of its negative:
//! flat regions wash out to white while edges stay dark, which reads as a
//! graphite line drawing.

mod effect;

pub use effect::PencilSketchStyle;

// Pencil-sketch parameter keys
pub const BLUR_KERNEL: &str = "blur_kernel";
pub const DODGE_SCALE: &str = "dodge_scale";
