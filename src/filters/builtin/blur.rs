//! Blur filters: Gaussian blur

use crate::core::error::RenderError;
use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use crate::filters::builtin::common;
use image::RgbaImage;

/// Default blur radius when none is set.
pub const DEFAULT_BLUR_RADIUS: f32 = 10.0;

/// Applies a Gaussian blur; the radius is the standard deviation in pixels.
#[derive(Debug, Clone, Copy)]
pub struct GaussianBlur;

impl ImageFilter for GaussianBlur {
    fn kind(&self) -> FilterKind {
        FilterKind::GaussianBlur
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Soften the image with a Gaussian blur")
            .category(Category::Blur)
            .parameter(
                ParameterDefinition::new(ParameterKey::Radius, DEFAULT_BLUR_RADIUS)
                    .with_description("Standard deviation of the blur in pixels (0 = no blur)")
                    .logarithmic(),
            )
            .tags(["soften", "smooth", "gauss"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let radius = params.get_or(ParameterKey::Radius, DEFAULT_BLUR_RADIUS);
        Ok(common::gaussian(input, radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_gaussian_blur_metadata() {
        let metadata = GaussianBlur.metadata();
        assert_eq!(metadata.id(), "gaussian_blur");
        assert_eq!(metadata.category, Category::Blur);
        assert_eq!(metadata.default_for(ParameterKey::Radius), Some(DEFAULT_BLUR_RADIUS));
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let input = checkerboard(8);
        let params = FilterParameters::new().with(ParameterKey::Radius, 0.0);
        assert_eq!(GaussianBlur.apply(&input, &params).unwrap(), input);
    }

    #[test]
    fn test_blur_smooths_checkerboard() {
        let input = checkerboard(8);
        let params = FilterParameters::new().with(ParameterKey::Radius, 2.0);
        let output = GaussianBlur.apply(&input, &params).unwrap();

        assert_eq!(output.dimensions(), input.dimensions());
        let center = output.get_pixel(4, 4).0[0];
        assert!(center > 64 && center < 192, "center = {}", center);
    }

    #[test]
    fn test_unset_radius_uses_default() {
        let input = checkerboard(8);
        let output = GaussianBlur.apply(&input, &FilterParameters::new()).unwrap();
        assert_ne!(output, input);
    }
}
