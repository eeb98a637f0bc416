//! # Raster Module
//!
//! Byte-level image handling for the transform pipeline: decoding and PNG
//! encoding, upload validation, and bounded resizing.

pub mod codec;
pub mod resizer;
pub mod types;
pub mod validator;

pub use codec::{decode, encode_png};
pub use resizer::Resizer;
pub use types::{EncodedImage, PixelGrid};
pub use validator::Validator;
