//! Active filter selection.

use crate::core::filter::FilterKind;

/// Holds which filter is currently active.
///
/// Selection is always valid; the catalog is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterSelector {
    active: FilterKind,
}

impl FilterSelector {
    /// Start with `initial` active.
    pub fn new(initial: FilterKind) -> Self {
        Self { active: initial }
    }

    /// The active filter.
    pub fn active(&self) -> FilterKind {
        self.active
    }

    /// Make `kind` active, returning the filter it replaced.
    pub fn select(&mut self, kind: FilterKind) -> FilterKind {
        std::mem::replace(&mut self.active, kind)
    }
}
