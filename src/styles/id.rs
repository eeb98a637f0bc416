use serde::{Deserialize, Serialize};
use std::fmt;

/// The built-in artistic styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    PencilSketch,
    OilPainting,
    ModernArt,
    Anime,
}

impl StyleId {
    /// Every built-in style, in presentation order
    pub const ALL: [StyleId; 4] = [
        StyleId::PencilSketch,
        StyleId::OilPainting,
        StyleId::ModernArt,
        StyleId::Anime,
    ];

    /// Style used when a request names no style or an unknown one
    pub const DEFAULT: StyleId = StyleId::ModernArt;

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::PencilSketch => "pencil_sketch",
            StyleId::OilPainting => "oil_painting",
            StyleId::ModernArt => "modern_art",
            StyleId::Anime => "anime",
        }
    }

    /// Parse a style name leniently
    ///
    /// Surrounding whitespace and case are ignored, and `-` or spaces may stand
    /// in for `_`, so `"Pencil Sketch"` and `"oil-painting"` both resolve.
    pub fn from_name(name: &str) -> Option<StyleId> {
        let normalized = normalize(name);
        StyleId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
    }

    /// Parse a style name, falling back to [`StyleId::DEFAULT`]
    pub fn resolve(name: &str) -> StyleId {
        StyleId::from_name(name).unwrap_or(StyleId::DEFAULT)
    }
}

impl Default for StyleId {
    fn default() -> Self {
        StyleId::DEFAULT
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical lookup key for a style name
pub fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
