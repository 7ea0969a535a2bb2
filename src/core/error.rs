//! Error types for InstaFilter.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Keep "nothing rendered yet" apart from "render failed"
//! - Carry the filter or path involved so log lines are actionable
//! - Convert into the top-level error with `?`

use crate::core::filter::FilterKind;
use crate::core::types::ImageFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for InstaFilter.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum InstaFilterError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),
}

/// Errors produced while executing a filter transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Source image has an empty extent ({width}x{height})")]
    EmptyExtent { width: u32, height: u32 },

    #[error("Filter '{filter}' failed: {reason}")]
    Filter { filter: FilterKind, reason: String },
}

/// Errors reported by an image library writer.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Nothing has been rendered yet")]
    NothingRendered,

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {format} image: {source}")]
    Encode {
        format: ImageFormat,
        #[source]
        source: image::ImageError,
    },

    #[error("Image library does not support the {0} format")]
    UnsupportedFormat(ImageFormat),

    #[error("Library writer stopped before reporting a result")]
    WriterDisconnected,
}

/// Errors while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

// ============================================================================
// Error Utilities
// ============================================================================

impl RenderError {
    /// Get the filter that caused this error, if applicable.
    pub fn filter(&self) -> Option<FilterKind> {
        match self {
            RenderError::Filter { filter, .. } => Some(*filter),
            RenderError::EmptyExtent { .. } => None,
        }
    }
}

impl SaveError {
    /// Check if retrying the same save could succeed.
    ///
    /// Nothing retries automatically; this is for callers that report errors.
    pub fn is_transient(&self) -> bool {
        matches!(self, SaveError::Io { .. } | SaveError::WriterDisconnected)
    }
}

/// Result type alias for InstaFilter operations.
pub type InstaFilterResult<T> = Result<T, InstaFilterError>;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_filter() {
        let error = RenderError::Filter {
            filter: FilterKind::GaussianBlur,
            reason: "boom".to_string(),
        };
        assert_eq!(error.filter(), Some(FilterKind::GaussianBlur));
        assert!(error.to_string().contains("gaussian_blur"));

        let error = RenderError::EmptyExtent { width: 0, height: 4 };
        assert_eq!(error.filter(), None);
    }

    #[test]
    fn test_save_error_transient() {
        assert!(SaveError::WriterDisconnected.is_transient());
        assert!(!SaveError::NothingRendered.is_transient());
        assert!(!SaveError::UnsupportedFormat(ImageFormat::Gif).is_transient());
    }

    #[test]
    fn test_conversion_into_top_level() {
        fn fails() -> InstaFilterResult<()> {
            Err(SaveError::NothingRendered)?
        }
        assert!(matches!(
            fails(),
            Err(InstaFilterError::Save(SaveError::NothingRendered))
        ));
    }
}
