//! # InstaFilter - One-knob photo filters
//!
//! InstaFilter is the core of a single-screen photo editor: pick a photo,
//! pick one of seven filters, drag a single intensity slider, save the
//! result to a photo library.
//!
//! ## Features
//!
//! - **One Knob**: a scalar intensity in [0, 1] is mapped onto whichever of
//!   intensity, radius and scale the active filter accepts
//! - **Always Fresh**: every control change re-renders synchronously, so the
//!   preview is never stale
//! - **Deterministic**: identical inputs give bitwise identical pixels
//! - **Non-blocking Saves**: library writers return a [`SaveTicket`] and finish
//!   on their own thread
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use instafilter::prelude::*;
//!
//! let mut session = EditorSession::default();
//! session.load_image(SourceImage::from_path("photo.jpg")?);
//! session.select_filter(FilterKind::Vignette);
//! session.set_intensity(Intensity::new(0.8));
//!
//! let library = DirectoryLibrary::new(LibraryConfig::default());
//! let ticket = session.save(&library)?;
//! report_outcome(&ticket.wait());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Filter catalog, parameter mapping, image types and errors
//! - [`filters`]: Filter registry, selector and built-in implementations
//! - [`pipeline`]: The render function and the editor session
//! - [`library`]: Saving rendered photos
//! - [`config`]: TOML configuration
//!
//! [`SaveTicket`]: library::SaveTicket

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod filters;
pub mod library;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use instafilter::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ImageFormat, ImageMetadata, ImageOrigin, RenderedImage, SourceImage};

    // Filters and parameters
    pub use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
    pub use crate::core::param::{FilterParameters, Intensity, ParameterDefinition, ParameterKey, UiHint};

    // Errors
    pub use crate::core::error::{
        ConfigError, InstaFilterError, InstaFilterResult, RenderError, RenderResult, SaveError, SaveResult,
    };

    // Registry
    pub use crate::filters::{FilterRegistry, FilterSelector, RegistryEntry};

    // Rendering
    pub use crate::pipeline::{render, EditorSession, RenderState};

    // Library
    pub use crate::library::{report_outcome, DirectoryLibrary, ImageLibraryWriter, SaveTicket, SavedImage};

    // Configuration
    pub use crate::config::{AppConfig, LibraryConfig, SessionConfig};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "instafilter");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = FilterRegistry::with_builtins();

        assert!(registry.contains(FilterKind::Crystallize));
        assert!(registry.contains(FilterKind::SepiaTone));
        assert!(registry.contains(FilterKind::Vignette));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_session_from_default_config() {
        let config = AppConfig::default();
        let session = EditorSession::from_config(&config.session);
        assert_eq!(session.filter(), FilterKind::SepiaTone);
        assert!(session.state().is_empty());
    }
}
