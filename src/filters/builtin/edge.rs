//! Edge detection filters

use crate::core::error::RenderError;
use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use crate::filters::builtin::common::{self, from_unit, sample_clamped, to_unit};
use image::RgbaImage;

/// Default edge gain when none is set.
pub const DEFAULT_EDGE_INTENSITY: f32 = 1.0;

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Highlights edges: per-channel Sobel gradient magnitude scaled by intensity.
#[derive(Debug, Clone, Copy)]
pub struct Edges;

impl ImageFilter for Edges {
    fn kind(&self) -> FilterKind {
        FilterKind::Edges
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Find the edges of the photo and display them in color")
            .category(Category::Edge)
            .parameter(
                ParameterDefinition::new(ParameterKey::Intensity, DEFAULT_EDGE_INTENSITY)
                    .with_display_name("Gain")
                    .with_description("Gain applied to the gradient magnitude"),
            )
            .tags(["sobel", "outline", "contour"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let gain = params.get_or(ParameterKey::Intensity, DEFAULT_EDGE_INTENSITY);

        Ok(common::map_positions(input, |x, y| {
            let mut gx = [0.0f32; 3];
            let mut gy = [0.0f32; 3];

            for (ky, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                for kx in 0..3 {
                    let p = sample_clamped(
                        input,
                        x as i64 + kx as i64 - 1,
                        y as i64 + ky as i64 - 1,
                    );
                    for c in 0..3 {
                        let v = to_unit(p[c]);
                        gx[c] += row_x[kx] * v;
                        gy[c] += row_y[kx] * v;
                    }
                }
            }

            let magnitude = |c: usize| from_unit((gx[c] * gx[c] + gy[c] * gy[c]).sqrt() * gain);
            let alpha = input.get_pixel(x, y).0[3];
            [magnitude(0), magnitude(1), magnitude(2), alpha]
        }))
    }
}
