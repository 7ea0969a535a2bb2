//! Render pipeline: one scalar plus one filter in, one raster out.

use crate::core::error::{RenderError, RenderResult};
use crate::core::filter::FilterKind;
use crate::core::param::{FilterParameters, Intensity};
use crate::core::types::{RenderedImage, SourceImage};
use std::time::Instant;

/// Configure `kind` from `intensity` and run it over `source`.
///
/// Only the parameters the filter declares are derived from the intensity;
/// the rest keep the filter's own defaults. The intensity is used as given.
/// Identical inputs always produce identical pixels.
pub fn render(source: &SourceImage, kind: FilterKind, intensity: Intensity) -> RenderResult<RenderedImage> {
    let (width, height) = source.dimensions();
    if source.is_empty() {
        return Err(RenderError::EmptyExtent { width, height });
    }

    let input = source.image().to_rgba8();
    let parameters = FilterParameters::from_intensity(kind, intensity);

    if log::log_enabled!(log::Level::Debug) {
        let metadata = kind.filter().metadata();
        for (key, value) in parameters.iter() {
            if metadata.get_parameter(key).is_some_and(|def| !def.in_range(value)) {
                log::debug!("{} {}={} is outside its documented range", kind, key, value);
            }
        }
    }

    let start = Instant::now();
    let output = kind.filter().apply(&input, &parameters)?;
    let elapsed = start.elapsed();

    if output.dimensions() != (width, height) {
        return Err(RenderError::Filter {
            filter: kind,
            reason: format!(
                "output is {}x{}, expected the source extent {}x{}",
                output.width(),
                output.height(),
                width,
                height
            ),
        });
    }

    log::debug!(
        "Rendered {} at intensity {} {} over {}x{} in {:?}",
        kind,
        intensity,
        parameters,
        width,
        height,
        elapsed
    );

    Ok(RenderedImage::new(output, kind, intensity, parameters, elapsed))
}
