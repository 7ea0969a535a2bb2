//! Built-in filter implementations.
//!
//! One implementation per [`FilterKind`]; the catalog is closed, so lookup
//! by kind cannot fail.

mod blur;
mod color;
pub(crate) mod common;
mod edge;
mod sharpen;
mod stylize;

use crate::core::filter::{FilterKind, ImageFilter};
use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    for kind in FilterKind::ALL {
        registry.register(filter_for(kind));
    }
}

/// The implementation backing a catalog entry.
pub fn filter_for(kind: FilterKind) -> &'static dyn ImageFilter {
    match kind {
        FilterKind::Crystallize => &Crystallize,
        FilterKind::Edges => &Edges,
        FilterKind::GaussianBlur => &GaussianBlur,
        FilterKind::Pixellate => &Pixellate,
        FilterKind::SepiaTone => &SepiaTone,
        FilterKind::UnsharpMask => &UnsharpMask,
        FilterKind::Vignette => &Vignette,
    }
}

// Re-export for direct access
pub use blur::{GaussianBlur, DEFAULT_BLUR_RADIUS};
pub use color::{
    sepia_rgb, SepiaTone, Vignette, DEFAULT_SEPIA_INTENSITY, DEFAULT_VIGNETTE_INTENSITY,
    DEFAULT_VIGNETTE_RADIUS,
};
pub use edge::{Edges, DEFAULT_EDGE_INTENSITY};
pub use sharpen::{UnsharpMask, DEFAULT_UNSHARP_INTENSITY, DEFAULT_UNSHARP_RADIUS};
pub use stylize::{Crystallize, Pixellate, DEFAULT_CRYSTAL_RADIUS, DEFAULT_PIXELLATE_SCALE};
