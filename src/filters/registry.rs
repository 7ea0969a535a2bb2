//! Filter registry: the catalog the picker is built from.

use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use indexmap::IndexMap;

/// Registry entry containing metadata and implementation.
#[derive(Clone)]
pub struct RegistryEntry {
    /// The implementation.
    pub filter: &'static dyn ImageFilter,
    /// Cached metadata.
    pub metadata: FilterMetadata,
}

/// Registry of the available filters, in picker order.
///
/// Built from the closed [`FilterKind`] catalog; it exists to answer the
/// picker's questions (what is there, what is it called, what does it
/// accept), not to extend the catalog at runtime.
pub struct FilterRegistry {
    /// Filters in registration order.
    filters: IndexMap<FilterKind, RegistryEntry>,
    /// Filters grouped by category.
    categories: IndexMap<Category, Vec<FilterKind>>,
}

impl FilterRegistry {
    fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry populated with every built-in filter.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter implementation.
    pub(crate) fn register(&mut self, filter: &'static dyn ImageFilter) {
        let metadata = filter.metadata();
        let kind = filter.kind();
        let category = metadata.category;

        self.filters.insert(kind, RegistryEntry { filter, metadata });
        self.categories.entry(category).or_default().push(kind);
    }

    /// Look up a filter by id or display name.
    pub fn resolve(&self, name: &str) -> Option<FilterKind> {
        name.parse::<FilterKind>()
            .ok()
            .filter(|kind| self.filters.contains_key(kind))
    }

    /// Get the implementation of a filter.
    pub fn get(&self, kind: FilterKind) -> Option<&'static dyn ImageFilter> {
        self.filters.get(&kind).map(|e| e.filter)
    }

    /// Get metadata for a filter.
    pub fn get_metadata(&self, kind: FilterKind) -> Option<&FilterMetadata> {
        self.filters.get(&kind).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, kind: FilterKind) -> bool {
        self.filters.contains_key(&kind)
    }

    /// All registered kinds, in picker order.
    pub fn kinds(&self) -> impl Iterator<Item = FilterKind> + '_ {
        self.filters.keys().copied()
    }

    /// All registered metadata, in picker order.
    pub fn metadata(&self) -> impl Iterator<Item = &FilterMetadata> {
        self.filters.values().map(|e| &e.metadata)
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: Category) -> Vec<FilterKind> {
        self.categories.get(&category).cloned().unwrap_or_default()
    }

    /// Get all categories that have at least one filter.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.keys()
    }

    /// Search filters by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<FilterKind> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(kind, entry)| {
                let id_match = kind.id().contains(&query);
                let name_match = entry.metadata.name.to_lowercase().contains(&query);
                let desc_match = entry.metadata.description.to_lowercase().contains(&query);
                let tag_match = entry.metadata.tags.iter().any(|t| t.to_lowercase().contains(&query));

                id_match || name_match || desc_match || tag_match
            })
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get filters grouped by category, in category display order.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for category in Category::all() {
            let Some(kinds) = self.categories.get(category) else {
                continue;
            };
            let mut filters: Vec<&FilterMetadata> = kinds
                .iter()
                .filter_map(|kind| self.get_metadata(*kind))
                .collect();
            filters.sort_by(|a, b| a.name.cmp(&b.name));
            grouped.insert(*category, filters);
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_cover_catalog() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.len(), FilterKind::ALL.len());
        for kind in FilterKind::ALL {
            assert!(registry.contains(kind));
            assert_eq!(registry.get(kind).map(|f| f.kind()), Some(kind));
        }
    }

    #[test]
    fn test_picker_order() {
        let registry = FilterRegistry::with_builtins();
        let kinds: Vec<FilterKind> = registry.kinds().collect();
        assert_eq!(kinds, FilterKind::ALL.to_vec());
    }

    #[test]
    fn test_resolve() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.resolve("vignette"), Some(FilterKind::Vignette));
        assert_eq!(registry.resolve("Sepia Tone"), Some(FilterKind::SepiaTone));
        assert_eq!(registry.resolve("posterize"), None);
    }

    #[test]
    fn test_metadata_lookup() {
        let registry = FilterRegistry::with_builtins();
        let metadata = registry.get_metadata(FilterKind::GaussianBlur).unwrap();
        assert_eq!(metadata.name, "Gaussian Blur");
    }

    #[test]
    fn test_category_grouping() {
        let registry = FilterRegistry::with_builtins();

        let stylize = registry.filters_by_category(Category::Stylize);
        assert!(stylize.contains(&FilterKind::Crystallize));
        assert!(stylize.contains(&FilterKind::Pixellate));

        let grouped = registry.grouped_by_category();
        let total: usize = grouped.values().map(|v| v.len()).sum();
        assert_eq!(total, registry.len());
        assert_eq!(grouped.keys().next(), Some(&Category::Stylize));
    }

    #[test]
    fn test_search() {
        let registry = FilterRegistry::with_builtins();

        let results = registry.search("blur");
        assert!(results.contains(&FilterKind::GaussianBlur));

        let results = registry.search("mosaic");
        assert_eq!(results, vec![FilterKind::Crystallize]);

        assert!(registry.search("nonexistent").is_empty());
    }
}
