//! Core types, traits, and error handling.

pub mod error;
pub mod filter;
pub mod param;
pub mod types;

pub use error::{ConfigError, InstaFilterError, RenderError, SaveError};
pub use filter::{Category, FilterKind, FilterMetadata, ImageFilter};
pub use param::{FilterParameters, Intensity, ParameterDefinition, ParameterKey};
pub use types::{ImageFormat, ImageMetadata, ImageOrigin, RenderedImage, SourceImage};
