use std::collections::HashMap;

use tracing::warn;

use crate::error::{Result, StyleError};
use crate::styles::id::normalize;
use crate::styles::{AnimeStyle, ModernArtStyle, OilPaintingStyle, PencilSketchStyle, Style, StyleId};

type StyleFactory = Box<dyn Fn() -> Box<dyn Style> + Send + Sync>;

/// Registry and dispatcher for the available styles
///
/// Styles are registered by name. [`StyleRegistry::dispatch`] never fails: a
/// missing or unknown name resolves to the default style (ModernArt unless
/// configured otherwise) and a warning is logged.
pub struct StyleRegistry {
    styles: HashMap<String, StyleFactory>,
    default_style: String,
}

impl StyleRegistry {
    /// Create a new style registry with all built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            styles: HashMap::new(),
            default_style: StyleId::DEFAULT.as_str().to_string(),
        };

        registry.register_builtin_styles();
        registry
    }

    /// Create a registry whose fallback is `default_style`
    ///
    /// Fails if no style of that name is registered.
    pub fn with_default(default_style: &str) -> Result<Self> {
        let mut registry = Self::new();
        registry.set_default(default_style)?;
        Ok(registry)
    }

    fn register_builtin_styles(&mut self) {
        self.styles.insert(
            StyleId::PencilSketch.as_str().to_string(),
            Box::new(|| Box::new(PencilSketchStyle::new())),
        );

        self.styles.insert(
            StyleId::OilPainting.as_str().to_string(),
            Box::new(|| Box::new(OilPaintingStyle::new())),
        );

        self.styles.insert(
            StyleId::ModernArt.as_str().to_string(),
            Box::new(|| Box::new(ModernArtStyle::new())),
        );

        self.styles.insert(
            StyleId::Anime.as_str().to_string(),
            Box::new(|| Box::new(AnimeStyle::new())),
        );
    }

    /// Register a custom style
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the style; normalized like built-in names
    /// * `factory` - Function that creates new instances of the style
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Style> + Send + Sync + 'static,
    {
        self.styles.insert(normalize(name), Box::new(factory));
    }

    /// Change the fallback style
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let key = normalize(name);
        if !self.styles.contains_key(&key) {
            return Err(StyleError::NotFound { name: name.to_string() }.into());
        }
        self.default_style = key;
        Ok(())
    }

    /// Name of the fallback style
    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    /// Get a style by name
    ///
    /// Returns a new instance of the requested style, or None if the style
    /// is not registered.
    pub fn get_style(&self, name: &str) -> Option<Box<dyn Style>> {
        self.styles.get(&normalize(name)).map(|factory| factory())
    }

    /// Select the style for a request, falling back to the default
    pub fn dispatch(&self, name: Option<&str>) -> Box<dyn Style> {
        if let Some(style) = name.and_then(|name| self.get_style(name)) {
            return style;
        }

        match name {
            Some(name) => warn!("Unknown style '{}', falling back to '{}'", name, self.default_style),
            None => warn!("No style requested, falling back to '{}'", self.default_style),
        }

        match self.styles.get(&self.default_style) {
            Some(factory) => factory(),
            None => Box::new(ModernArtStyle::new()),
        }
    }

    /// Get all available style names, sorted
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a style is available
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(&normalize(name))
    }

    /// Get the number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
