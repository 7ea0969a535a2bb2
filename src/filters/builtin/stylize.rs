//! Stylize filters: crystallize (Voronoi cells) and pixellate (square blocks)

use crate::core::error::RenderError;
use crate::core::filter::{Category, FilterKind, FilterMetadata, ImageFilter};
use crate::core::param::{FilterParameters, ParameterDefinition, ParameterKey};
use crate::filters::builtin::common::{self, hash_unit, sample_clamped};
use image::RgbaImage;

/// Default crystal size in pixels.
pub const DEFAULT_CRYSTAL_RADIUS: f32 = 20.0;

/// Default block size in pixels.
pub const DEFAULT_PIXELLATE_SCALE: f32 = 8.0;

/// Fixed jitter seed so the same radius always yields the same cells.
const CRYSTAL_SEED: u32 = 0x1F2E_3D4C;

/// Breaks the image into polygonal cells of flat color.
///
/// Cells come from a jittered grid of `radius`-sized squares; every pixel
/// takes the color found under its nearest seed point.
#[derive(Debug, Clone, Copy)]
pub struct Crystallize;

impl ImageFilter for Crystallize {
    fn kind(&self) -> FilterKind {
        FilterKind::Crystallize
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Turn the photo into a mosaic of polygonal crystals")
            .category(Category::Stylize)
            .parameter(
                ParameterDefinition::new(ParameterKey::Radius, DEFAULT_CRYSTAL_RADIUS)
                    .with_display_name("Cell Size")
                    .with_description("Crystal size in pixels (below 1 = untouched)"),
            )
            .tags(["mosaic", "voronoi", "cells"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let cs = params.get_or(ParameterKey::Radius, DEFAULT_CRYSTAL_RADIUS);
        if !(cs >= 1.0) || common::is_empty(input) {
            return Ok(input.clone());
        }

        let (w, h) = input.dimensions();
        let cells_x = ((w as f32 / cs).ceil() as i64).max(1);
        let cells_y = ((h as f32 / cs).ceil() as i64).max(1);

        // One jittered seed per grid cell, with the color underneath it.
        let mut seeds: Vec<(f32, f32, [u8; 4])> = Vec::with_capacity((cells_x * cells_y) as usize);
        for gy in 0..cells_y {
            for gx in 0..cells_x {
                let jx = hash_unit(gx as u32, gy as u32, CRYSTAL_SEED);
                let jy = hash_unit(gx as u32, gy as u32, CRYSTAL_SEED.wrapping_add(77));
                let sx = (gx as f32 + jx) * cs;
                let sy = (gy as f32 + jy) * cs;
                let color = sample_clamped(input, sx as i64, sy as i64);
                seeds.push((sx, sy, color));
            }
        }

        let seeds = &seeds;
        Ok(common::map_positions(input, |x, y| {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let gcx = (x as f32 / cs) as i64;
            let gcy = (y as f32 / cs) as i64;

            let mut best = f32::MAX;
            let mut color = [0u8; 4];
            for ny in (gcy - 1)..=(gcy + 1) {
                for nx in (gcx - 1)..=(gcx + 1) {
                    if nx < 0 || ny < 0 || nx >= cells_x || ny >= cells_y {
                        continue;
                    }
                    let (sx, sy, c) = seeds[(ny * cells_x + nx) as usize];
                    let d = (px - sx) * (px - sx) + (py - sy) * (py - sy);
                    if d < best {
                        best = d;
                        color = c;
                    }
                }
            }
            color
        }))
    }
}

/// Replaces the image with square blocks sampled at each block centre.
#[derive(Debug, Clone, Copy)]
pub struct Pixellate;

impl ImageFilter for Pixellate {
    fn kind(&self) -> FilterKind {
        FilterKind::Pixellate
    }

    fn metadata(&self) -> FilterMetadata {
        FilterMetadata::builder(self.kind())
            .description("Render the photo as large square pixels")
            .category(Category::Stylize)
            .parameter(
                ParameterDefinition::new(ParameterKey::Scale, DEFAULT_PIXELLATE_SCALE)
                    .with_display_name("Block Size")
                    .with_description("Block side in pixels (1 or less = untouched)"),
            )
            .tags(["pixel", "blocks", "8-bit"])
            .build()
    }

    fn apply(&self, input: &RgbaImage, params: &FilterParameters) -> Result<RgbaImage, RenderError> {
        let side = params.get_or(ParameterKey::Scale, DEFAULT_PIXELLATE_SCALE).round();
        if !(side > 1.0) || common::is_empty(input) {
            return Ok(input.clone());
        }

        let bs = side as u32;
        let (w, h) = input.dimensions();
        Ok(common::map_positions(input, |x, y| {
            let sx = ((x / bs) * bs + bs / 2).min(w - 1);
            let sy = ((y / bs) * bs + bs / 2).min(h - 1);
            input.get_pixel(sx, sy).0
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255]))
    }

    #[test]
    fn test_stylize_metadata() {
        assert_eq!(Crystallize.metadata().id(), "crystallize");
        assert_eq!(Pixellate.metadata().id(), "pixellate");
        assert_eq!(Pixellate.metadata().category, Category::Stylize);
    }

    #[test]
    fn test_pixellate_blocks_are_uniform() {
        let input = gradient(16, 16);
        let params = FilterParameters::new().with(ParameterKey::Scale, 4.0);
        let output = Pixellate.apply(&input, &params).unwrap();

        let block = output.get_pixel(4, 4).0;
        for y in 4..8 {
            for x in 4..8 {
                assert_eq!(output.get_pixel(x, y).0, block);
            }
        }
        assert_eq!(block, input.get_pixel(6, 6).0);
        assert_ne!(output.get_pixel(0, 0).0, block);
    }

    #[test]
    fn test_pixellate_small_scale_is_identity() {
        let input = gradient(8, 8);
        let params = FilterParameters::new().with(ParameterKey::Scale, 1.2);
        assert_eq!(Pixellate.apply(&input, &params).unwrap(), input);
    }

    #[test]
    fn test_pixellate_partial_edge_blocks() {
        let input = gradient(10, 10);
        let params = FilterParameters::new().with(ParameterKey::Scale, 8.0);
        let output = Pixellate.apply(&input, &params).unwrap();
        assert_eq!(output.get_pixel(9, 9).0, input.get_pixel(9, 9).0);
    }

    #[test]
    fn test_crystallize_zero_radius_is_identity() {
        let input = gradient(8, 8);
        let params = FilterParameters::new().with(ParameterKey::Radius, 0.0);
        assert_eq!(Crystallize.apply(&input, &params).unwrap(), input);
    }

    #[test]
    fn test_crystallize_uses_source_colors() {
        let input = gradient(24, 24);
        let params = FilterParameters::new().with(ParameterKey::Radius, 6.0);
        let output = Crystallize.apply(&input, &params).unwrap();

        assert_eq!(output.dimensions(), input.dimensions());
        assert_ne!(output, input);
        for p in output.pixels() {
            assert!(input.pixels().any(|q| q == p));
        }
    }

    #[test]
    fn test_crystallize_is_deterministic() {
        let input = gradient(20, 20);
        let params = FilterParameters::new().with(ParameterKey::Radius, 5.0);
        let a = Crystallize.apply(&input, &params).unwrap();
        let b = Crystallize.apply(&input, &params).unwrap();
        assert_eq!(a, b);
    }
}
