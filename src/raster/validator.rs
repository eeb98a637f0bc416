use tracing::debug;

use crate::error::{ImageError, Result};
use crate::raster::codec;
use crate::raster::types::PixelGrid;

/// Rejects oversized and undecodable payloads before any filter work runs
///
/// Validation decodes eagerly, so the decoded grid is handed back to the caller
/// rather than thrown away.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    max_bytes: usize,
}

impl Validator {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check the byte ceiling only
    pub fn check_size(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.max_bytes {
            return Err(ImageError::FileTooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            }
            .into());
        }
        Ok(())
    }

    /// Check the byte ceiling, then decode
    pub fn validate(&self, bytes: &[u8]) -> Result<PixelGrid> {
        self.check_size(bytes)?;
        let grid = codec::decode(bytes)?;
        debug!(
            "Validated {} byte payload ({}x{})",
            bytes.len(),
            grid.width(),
            grid.height()
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StylizerError;

    fn png_bytes() -> Vec<u8> {
        let grid = PixelGrid::new_filled(10, 10, [1, 2, 3]).unwrap();
        codec::encode_png(&grid).unwrap().into_bytes()
    }

    #[test]
    fn test_exact_limit_accepted() {
        let bytes = png_bytes();
        let validator = Validator::new(bytes.len());
        let grid = validator.validate(&bytes).unwrap();
        assert_eq!(grid.dimensions(), (10, 10));
    }

    #[test]
    fn test_one_byte_over_rejected() {
        let bytes = png_bytes();
        let validator = Validator::new(bytes.len() - 1);
        let err = validator.validate(&bytes).unwrap_err();
        assert!(matches!(
            err,
            StylizerError::Image(ImageError::FileTooLarge { size, limit }) if size == limit + 1
        ));
    }

    #[test]
    fn test_size_checked_before_decode() {
        let garbage = vec![0u8; 64];
        let err = Validator::new(10).validate(&garbage).unwrap_err();
        assert!(matches!(err, StylizerError::Image(ImageError::FileTooLarge { .. })));

        let err = Validator::new(100).validate(&garbage).unwrap_err();
        assert!(matches!(err, StylizerError::Image(ImageError::DecodeFailed { .. })));
    }
}
