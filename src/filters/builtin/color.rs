//! Color filters: sepia tone and vignette

use crate::core::error::RenderError;
use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use crate::filters::builtin::common::{self, from_unit, to_unit};
use image::RgbaImage;

/// Default sepia strength when none is set.
pub const DEFAULT_SEPIA_INTENSITY: f32 = 1.0;

/// Default vignette strength when none is set.
pub const DEFAULT_VIGNETTE_INTENSITY: f32 = 0.0;

/// Default untouched radius around the centre, in pixels.
pub const DEFAULT_VIGNETTE_RADIUS: f32 = 1.0;

/// Classic sepia matrix, rows produce r, g, b.
const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Map one RGB triple (in [0, 1]) through the sepia matrix.
pub fn sepia_rgb(rgb: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (row, value) in SEPIA_MATRIX.iter().zip(out.iter_mut()) {
        *value = (row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]).min(1.0);
    }
    out
}

/// Tints the image brown, blending between original and full sepia.
#[derive(Debug, Clone, Copy)]
pub struct SepiaTone;

impl ImageFilter for SepiaTone {
    fn kind(&self) -> FilterKind {
        FilterKind::SepiaTone
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Give the photo an old-fashioned brown tint")
            .category(Category::Color)
            .parameter(
                ParameterDefinition::new(ParameterKey::Intensity, DEFAULT_SEPIA_INTENSITY)
                    .with_description("Blend between original (0) and full sepia (1)"),
            )
            .tags(["vintage", "brown", "retro"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let t = params.get_or(ParameterKey::Intensity, DEFAULT_SEPIA_INTENSITY);

        Ok(common::map_pixels(input, |_, _, [r, g, b, a]| {
            let src = [to_unit(r), to_unit(g), to_unit(b)];
            let sepia = sepia_rgb(src);
            let mix = |i: usize| from_unit(src[i] + (sepia[i] - src[i]) * t);
            [mix(0), mix(1), mix(2), a]
        }))
    }
}

/// Darkens the image towards the corners.
///
/// Pixels within `radius` pixels of the centre are untouched; beyond that the
/// darkening ramps smoothly up to `intensity` at the far corner.
#[derive(Debug, Clone, Copy)]
pub struct Vignette;

impl Vignette {
    /// Brightness multiplier for a pixel at `distance` from the centre.
    fn factor(distance: f32, radius: f32, corner: f32, intensity: f32) -> f32 {
        if distance <= radius || corner <= radius {
            return 1.0;
        }
        let t = ((distance - radius) / (corner - radius)).clamp(0.0, 1.0);
        let smooth = t * t * (3.0 - 2.0 * t);
        1.0 - intensity * smooth
    }
}

impl ImageFilter for Vignette {
    fn kind(&self) -> FilterKind {
        FilterKind::Vignette
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Darken the edges of the photo")
            .category(Category::Color)
            .parameter(
                ParameterDefinition::new(ParameterKey::Intensity, DEFAULT_VIGNETTE_INTENSITY)
                    .with_description("How dark the corners get (0 = no vignette)"),
            )
            .parameter(
                ParameterDefinition::new(ParameterKey::Radius, DEFAULT_VIGNETTE_RADIUS)
                    .with_display_name("Inner Radius")
                    .with_description("Untouched radius around the centre in pixels"),
            )
            .tags(["darken", "corners", "lens"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let intensity = params.get_or(ParameterKey::Intensity, DEFAULT_VIGNETTE_INTENSITY);
        let radius = params.get_or(ParameterKey::Radius, DEFAULT_VIGNETTE_RADIUS);

        let cx = input.width() as f32 / 2.0;
        let cy = input.height() as f32 / 2.0;
        let corner = (cx * cx + cy * cy).sqrt();

        Ok(common::map_pixels(input, |x, y, [r, g, b, a]| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let f = Self::factor((dx * dx + dy * dy).sqrt(), radius, corner, intensity);
            let shade = |v: u8| from_unit(to_unit(v) * f);
            [shade(r), shade(g), shade(b), a]
        }))
    }
}
