use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::Result,
    raster::{encode_png, EncodedImage, PixelGrid, Resizer, Validator},
    styles::{Style, StyleRegistry},
};

/// A single transformation request
///
/// Built per call and consumed by value; nothing about it outlives the call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    /// Raw encoded image bytes as uploaded
    pub bytes: Vec<u8>,

    /// Requested style name; `None` selects the configured default
    pub style: Option<String>,
}

impl TransformRequest {
    pub fn new(bytes: Vec<u8>, style: Option<String>) -> Self {
        Self { bytes, style }
    }
}

/// Engine that turns uploaded bytes into a stylized PNG
///
/// The pipeline is fixed:
/// 1. Validation - size ceiling, then a full decode
/// 2. Resizing - longest edge bounded by `limits.max_dimension`
/// 3. Dispatch - style lookup with fallback to the default style
/// 4. Stylizing - the pipeline runs; on failure the resized input is kept
/// 5. Encoding - always PNG
///
/// The engine holds only immutable state and can be shared across threads.
pub struct TransformEngine {
    config: Config,
    registry: StyleRegistry,
    validator: Validator,
    resizer: Resizer,
}

impl TransformEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let registry = StyleRegistry::with_default(&config.styles.default_style)?;
        let validator = Validator::new(config.limits.max_upload_bytes);
        let resizer = Resizer::new(config.limits.max_dimension);

        debug!(
            "Transform engine ready: max {} bytes, max dimension {}, default style '{}'",
            validator.max_bytes(),
            resizer.max_dimension(),
            registry.default_style()
        );

        Ok(Self { config, registry, validator, resizer })
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Style registry used for dispatch
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Transform encoded image bytes with the named style
    ///
    /// Input errors (`FileTooLarge`, `InvalidFormat`, `DecodeFailed`) and
    /// encode failures are returned. Style failures are not: the resized
    /// input is encoded instead.
    pub fn transform(&self, bytes: &[u8], style: &str) -> Result<EncodedImage> {
        self.run(bytes, Some(style))
    }

    /// Transform an owned request
    pub fn transform_request(&self, request: TransformRequest) -> Result<EncodedImage> {
        self.run(&request.bytes, request.style.as_deref())
    }

    /// Apply a style to an already decoded grid
    ///
    /// Resizing still applies. Never fails; see [`TransformEngine::transform`].
    pub fn stylize(&self, grid: PixelGrid, style: &str) -> PixelGrid {
        let resized = self.resizer.fit(grid);
        let style = self.registry.dispatch(Some(style));
        self.apply_with_fallback(style.as_ref(), resized)
    }

    fn run(&self, bytes: &[u8], style: Option<&str>) -> Result<EncodedImage> {
        info!("Transforming {} bytes with style {:?}", bytes.len(), style);

        let grid = self.validator.validate(bytes)?;
        let (width, height) = grid.dimensions();

        let resized = self.resizer.fit(grid);
        if resized.dimensions() != (width, height) {
            debug!(
                "Resized {}x{} -> {}x{}",
                width,
                height,
                resized.width(),
                resized.height()
            );
        }

        let style = self.registry.dispatch(style);
        let stylized = self.apply_with_fallback(style.as_ref(), resized);

        let encoded = encode_png(&stylized)?;
        info!(
            "Produced {}x{} PNG ({} bytes) with '{}'",
            stylized.width(),
            stylized.height(),
            encoded.len(),
            style.name()
        );
        Ok(encoded)
    }

    fn apply_with_fallback(&self, style: &dyn Style, grid: PixelGrid) -> PixelGrid {
        let style_config = self.config.styles.config_for(style.name());

        let result = style
            .validate_config(&style_config)
            .and_then(|_| style.apply_effect(&grid, &style_config));

        match result {
            Ok(stylized) if stylized.dimensions() == grid.dimensions() => stylized,
            Ok(stylized) => {
                warn!(
                    "Style '{}' changed dimensions {:?} -> {:?}, returning input",
                    style.name(),
                    grid.dimensions(),
                    stylized.dimensions()
                );
                grid
            }
            Err(e) => {
                warn!("Style '{}' failed, returning input: {}", style.name(), e);
                grid
            }
        }
    }
}

/// Transform `bytes` with `style` using a one-off engine built from `config`
pub fn transform(bytes: &[u8], style: &str, config: &Config) -> Result<EncodedImage> {
    TransformEngine::new(config.clone())?.transform(bytes, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImageError, StylizerError};
    use crate::raster::decode;
    use crate::styles::{StyleConfig, StyleMetadata};
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let grid = PixelGrid::new(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
        }))
        .unwrap();
        encode_png(&grid).unwrap().into_bytes()
    }

    struct FailingStyle;

    impl Style for FailingStyle {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn apply_effect(&self, _grid: &PixelGrid, _config: &StyleConfig) -> Result<PixelGrid> {
            Err(crate::error::StyleError::EffectFailed {
                effect: "failing".to_string(),
                reason: "test".to_string(),
            }
            .into())
        }

        fn metadata(&self) -> StyleMetadata {
            StyleMetadata { performance_impact: 0.0, optional_parameters: vec![] }
        }
    }

    #[test]
    fn test_transform_produces_png() {
        let engine = TransformEngine::new(Config::default()).unwrap();
        let out = engine.transform(&png_bytes(40, 20), "pencil_sketch").unwrap();

        assert_eq!(out.format(), Some(image::ImageFormat::Png));
        assert_eq!(decode(out.as_bytes()).unwrap().dimensions(), (40, 20));
    }

    #[test]
    fn test_request_without_style_uses_default() {
        let engine = TransformEngine::new(Config::default()).unwrap();
        let bytes = png_bytes(24, 24);

        let by_request = engine.transform_request(TransformRequest::new(bytes.clone(), None)).unwrap();
        let by_name = engine.transform(&bytes, "modern_art").unwrap();
        assert_eq!(by_request, by_name);
    }

    #[test]
    fn test_resize_before_pipeline() {
        let mut config = Config::default();
        config.limits.max_dimension = 50;
        let engine = TransformEngine::new(config).unwrap();

        let out = engine.transform(&png_bytes(200, 100), "anime").unwrap();
        assert_eq!(decode(out.as_bytes()).unwrap().dimensions(), (50, 25));
    }

    #[test]
    fn test_empty_input_rejected() {
        let engine = TransformEngine::new(Config::default()).unwrap();
        let err = engine.transform(&[], "anime").unwrap_err();
        assert!(matches!(err, StylizerError::Image(ImageError::DecodeFailed { .. })));
    }

    #[test]
    fn test_failing_style_returns_input() {
        let mut engine = TransformEngine::new(Config::default()).unwrap();
        engine.registry.register("failing", || Box::new(FailingStyle));

        let grid = decode(&png_bytes(16, 12)).unwrap();
        let out = engine.stylize(grid.clone(), "failing");
        assert_eq!(out, grid);
    }

    #[test]
    fn test_invalid_override_falls_back_to_input() {
        let mut engine = TransformEngine::new(Config::default()).unwrap();
        // Bypasses Config::validate, which would reject this up front.
        engine.config.styles.overrides.insert(
            "oil_painting".to_string(),
            StyleConfig::default().set("median_kernel", 4),
        );

        let grid = decode(&png_bytes(16, 12)).unwrap();
        assert_eq!(engine.stylize(grid.clone(), "oil_painting"), grid);
    }

    #[test]
    fn test_override_with_loose_key_reaches_pipeline() {
        let mut config = Config::default();
        config.styles.overrides.insert(
            "Oil-Painting".to_string(),
            StyleConfig::default().set("contrast", 2.0f32).set("brightness", 60),
        );
        let tuned = TransformEngine::new(config).unwrap();
        let plain = TransformEngine::new(Config::default()).unwrap();

        let bytes = png_bytes(24, 16);
        assert_ne!(
            tuned.transform(&bytes, "oil_painting").unwrap(),
            plain.transform(&bytes, "oil_painting").unwrap()
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.styles.default_style = "watercolor".to_string();
        assert!(TransformEngine::new(config).is_err());
    }

    #[test]
    fn test_free_function_matches_engine() {
        let config = Config::default();
        let bytes = png_bytes(20, 20);

        let engine = TransformEngine::new(config.clone()).unwrap();
        assert_eq!(
            transform(&bytes, "oil_painting", &config).unwrap(),
            engine.transform(&bytes, "oil_painting").unwrap()
        );
    }
}
