use thiserror::Error;

/// Main error type for the photo-stylizer library
#[derive(Error, Debug)]
pub enum StylizerError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Style processing error: {0}")]
    Style(#[from] StyleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while accepting, decoding or encoding image bytes
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Invalid file type: {reason}")]
    InvalidFormat { reason: String },

    #[error("File too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Image decoding failed: {reason}")]
    DecodeFailed { reason: String },

    #[error("Image encoding failed: {reason}")]
    EncodeFailed { reason: String },
}

/// Style-specific errors
///
/// These never reach the caller of a transform: the engine falls back to the
/// unmodified image and logs the error instead.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Style not found: {name}")]
    NotFound { name: String },

    #[error("Effect application failed: {effect} - {reason}")]
    EffectFailed { effect: String, reason: String },

    #[error("Style configuration invalid: {details}")]
    InvalidConfig { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using StylizerError
pub type Result<T> = std::result::Result<T, StylizerError>;

impl StylizerError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the failure was caused by the submitted image rather than by us
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Image(
                ImageError::InvalidFormat { .. }
                    | ImageError::FileTooLarge { .. }
                    | ImageError::DecodeFailed { .. }
            )
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::FileTooLarge { limit, .. }) => {
                format!("File too large. Maximum size is {} bytes.", limit)
            }
            Self::Image(ImageError::InvalidFormat { .. }) => {
                "Invalid file type. Please upload a PNG, JPEG, GIF, BMP or WebP image.".to_string()
            }
            Self::Image(ImageError::DecodeFailed { .. }) => {
                "Could not read the uploaded image. The file may be corrupt or truncated.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        let too_large: StylizerError = ImageError::FileTooLarge { size: 11, limit: 10 }.into();
        assert!(too_large.is_client_error());

        let decode: StylizerError = ImageError::DecodeFailed { reason: "empty".into() }.into();
        assert!(decode.is_client_error());

        let encode: StylizerError = ImageError::EncodeFailed { reason: "io".into() }.into();
        assert!(!encode.is_client_error());

        let style: StylizerError = StyleError::NotFound { name: "x".into() }.into();
        assert!(!style.is_client_error());
    }

    #[test]
    fn test_user_message_mentions_limit() {
        let err: StylizerError = ImageError::FileTooLarge { size: 20, limit: 16 }.into();
        assert!(err.user_message().contains("16"));
    }
}
