//! Sharpening filters: unsharp mask

use crate::core::error::RenderError;
use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use crate::filters::builtin::common;
use image::RgbaImage;

/// Default blur radius of the mask.
pub const DEFAULT_UNSHARP_RADIUS: f32 = 2.5;

/// Default amount of detail added back.
pub const DEFAULT_UNSHARP_INTENSITY: f32 = 0.5;

/// Sharpens by adding back the difference between the image and a blurred copy.
#[derive(Debug, Clone, Copy)]
pub struct UnsharpMask;

impl ImageFilter for UnsharpMask {
    fn kind(&self) -> FilterKind {
        FilterKind::UnsharpMask
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Increase contrast along edges")
            .category(Category::Sharpen)
            .parameter(
                ParameterDefinition::new(ParameterKey::Radius, DEFAULT_UNSHARP_RADIUS)
                    .with_description("Blur radius of the mask in pixels")
                    .logarithmic(),
            )
            .parameter(
                ParameterDefinition::new(ParameterKey::Intensity, DEFAULT_UNSHARP_INTENSITY)
                    .with_display_name("Amount")
                    .with_description("How much of the detail layer is added back"),
            )
            .tags(["sharpen", "detail", "crisp"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let radius = params.get_or(ParameterKey::Radius, DEFAULT_UNSHARP_RADIUS);
        let amount = params.get_or(ParameterKey::Intensity, DEFAULT_UNSHARP_INTENSITY);

        if !(radius > 0.0) || amount == 0.0 {
            return Ok(input.clone());
        }

        let blurred = common::gaussian(input, radius);
        Ok(common::map_pixels(input, |x, y, [r, g, b, a]| {
            let soft = blurred.get_pixel(x, y).0;
            let sharpen = |v: u8, s: u8| {
                let v = v as f32;
                (v + (v - s as f32) * amount).round().clamp(0.0, 255.0) as u8
            };
            [sharpen(r, soft[0]), sharpen(g, soft[1]), sharpen(b, soft[2]), a]
        }))
    }
}
