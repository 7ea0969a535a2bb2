//! The filter catalog and the `ImageFilter` trait.
//!
//! The catalog is closed: [`FilterKind`] enumerates every filter the editor
//! offers, and each variant statically declares which parameter keys it
//! accepts. The pixel work lives behind [`ImageFilter`], one implementation
//! per kind in `filters::builtin`.

use crate::core::error::RenderError;
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every filter the editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    #[default]
    SepiaTone,
    UnsharpMask,
    Vignette,
}

impl FilterKind {
    /// All kinds, in the order the picker lists them.
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::SepiaTone,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    /// Stable identifier (e.g. "gaussian_blur").
    pub fn id(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "crystallize",
            FilterKind::Edges => "edges",
            FilterKind::GaussianBlur => "gaussian_blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::SepiaTone => "sepia_tone",
            FilterKind::UnsharpMask => "unsharp_mask",
            FilterKind::Vignette => "vignette",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }

    /// The parameter keys this filter accepts.
    pub fn accepted_keys(&self) -> &'static [ParameterKey] {
        match self {
            FilterKind::Crystallize => &[ParameterKey::Radius],
            FilterKind::Edges => &[ParameterKey::Intensity],
            FilterKind::GaussianBlur => &[ParameterKey::Radius],
            FilterKind::Pixellate => &[ParameterKey::Scale],
            FilterKind::SepiaTone => &[ParameterKey::Intensity],
            FilterKind::UnsharpMask => &[ParameterKey::Radius, ParameterKey::Intensity],
            FilterKind::Vignette => &[ParameterKey::Intensity, ParameterKey::Radius],
        }
    }

    /// Check whether this filter accepts a key.
    pub fn accepts(&self, key: ParameterKey) -> bool {
        self.accepted_keys().contains(&key)
    }

    /// The implementation backing this kind.
    pub fn filter(&self) -> &'static dyn ImageFilter {
        crate::filters::builtin::filter_for(*self)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    /// Accepts ids ("sepia_tone"), kebab case and display names ("Sepia Tone").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| format!("unknown filter '{}'", s))
    }
}

/// Category for organizing filters in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Blur effects
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Edge detection
    Edge,
    /// Color grading
    Color,
    /// Geometric stylization (cells, blocks)
    Stylize,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Edge => "Edge",
            Category::Color => "Color",
            Category::Stylize => "Stylize",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Stylize,
            Category::Edge,
            Category::Blur,
            Category::Color,
            Category::Sharpen,
        ]
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Which catalog entry this describes
    pub kind: FilterKind,
    /// Human-readable name (e.g., "Gaussian Blur")
    pub name: String,
    /// Category for UI organization
    pub category: Category,
    /// Detailed description
    pub description: String,
    /// Accepted parameters with defaults
    pub parameters: Vec<ParameterDefinition>,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(kind: FilterKind) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(kind)
    }

    /// Stable identifier of the filter.
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Find a parameter by key.
    pub fn get_parameter(&self, key: ParameterKey) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// Default for a key, if this filter accepts it.
    pub fn default_for(&self, key: ParameterKey) -> Option<f32> {
        self.get_parameter(key).map(|p| p.default_value)
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    kind: FilterKind,
    name: String,
    category: Category,
    description: String,
    parameters: Vec<ParameterDefinition>,
    tags: Vec<String>,
}

impl FilterMetadataBuilder {
    /// Create a new builder; the name defaults to the kind's display name.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            name: kind.display_name().to_string(),
            category: Category::Color,
            description: String::new(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, param: ParameterDefinition) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            kind: self.kind,
            name: self.name,
            category: self.category,
            description: self.description,
            parameters: self.parameters,
            tags: self.tags,
        }
    }
}

/// An image transform.
///
/// Implementations must be deterministic: the same input and parameters
/// always produce the same pixels. The output covers the input's extent.
/// Unset parameters fall back to the defaults listed in
/// [`ImageFilter::metadata`].
pub trait ImageFilter: Send + Sync {
    /// Which catalog entry this implements.
    fn kind(&self) -> FilterKind;

    /// Get the metadata for this filter.
    fn metadata(&self) -> FilterMetadata;

    /// Apply the transform.
    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError>;
}
