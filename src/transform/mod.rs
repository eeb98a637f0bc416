//! # Transform Engine
//!
//! Ties validation, resizing, style dispatch and encoding into the single
//! `transform` operation.

pub mod engine;

// Re-exports for convenience
pub use engine::{transform, TransformEngine, TransformRequest};
