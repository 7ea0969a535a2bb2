//! Pixel helpers shared by the built-in filters.

use image::RgbaImage;
use rayon::prelude::*;

/// Convert an 8-bit channel to [0, 1].
#[inline]
pub(crate) fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Convert a [0, 1] value back to an 8-bit channel, rounding.
#[inline]
pub(crate) fn from_unit(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Whether the image covers no pixels.
#[inline]
pub(crate) fn is_empty(image: &RgbaImage) -> bool {
    image.width() == 0 || image.height() == 0
}

/// Per-pixel transform, parallel by row.
///
/// `transform` receives (x, y, rgba) and returns the output pixel.
pub(crate) fn map_pixels<F>(input: &RgbaImage, transform: F) -> RgbaImage
where
    F: Fn(u32, u32, [u8; 4]) -> [u8; 4] + Sync,
{
    let mut output = input.clone();
    if is_empty(input) {
        return output;
    }

    let stride = input.width() as usize * 4;
    let buf: &mut [u8] = &mut output;
    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let out = transform(x as u32, y as u32, [px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&out);
            }
        });

    output
}

/// Row-parallel transform with random access to the source.
///
/// `sample` receives (x, y) and returns the output pixel; it may read any
/// source pixel it captures.
pub(crate) fn map_positions<F>(input: &RgbaImage, sample: F) -> RgbaImage
where
    F: Fn(u32, u32) -> [u8; 4] + Sync,
{
    map_pixels(input, |x, y, _| sample(x, y))
}

/// Read a pixel with coordinates clamped to the image bounds.
#[inline]
pub(crate) fn sample_clamped(image: &RgbaImage, x: i64, y: i64) -> [u8; 4] {
    let cx = x.clamp(0, image.width() as i64 - 1) as u32;
    let cy = y.clamp(0, image.height() as i64 - 1) as u32;
    image.get_pixel(cx, cy).0
}

/// Largest sigma blurred with an exact kernel; wider blurs use box passes.
pub(crate) const EXACT_BLUR_MAX_SIGMA: f32 = 4.0;

/// Number of box passes approximating one Gaussian.
const BOX_PASSES: usize = 3;

/// Gaussian blur with edge clamping; `sigma <= 0` (or NaN) is the identity.
///
/// Small sigmas use imageproc's exact kernel. Above
/// [`EXACT_BLUR_MAX_SIGMA`] the blur is three running-sum box passes per
/// axis, so the cost does not grow with sigma.
pub(crate) fn gaussian(input: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma > 0.0) || is_empty(input) {
        return input.clone();
    }
    if sigma <= EXACT_BLUR_MAX_SIGMA {
        return imageproc::filter::gaussian_blur_f32(input, sigma);
    }
    box_gaussian(input, sigma)
}

/// Box radii whose successive application matches a Gaussian of `sigma`.
fn box_radii(sigma: f32) -> [usize; BOX_PASSES] {
    let n = BOX_PASSES as f32;
    let variance = 12.0 * sigma * sigma;

    let mut lower = ((variance / n + 1.0).sqrt().floor() as usize).max(1);
    if lower % 2 == 0 {
        lower -= 1;
    }
    let upper = lower + 2;
    let l = lower as f32;
    let smaller = ((variance - n * l * l - 4.0 * n * l - 3.0 * n) / (-4.0 * l - 4.0)).round();

    let mut radii = [0; BOX_PASSES];
    for (i, radius) in radii.iter_mut().enumerate() {
        let width = if (i as f32) < smaller { lower } else { upper };
        *radius = (width - 1) / 2;
    }
    radii
}

fn box_gaussian(input: &RgbaImage, sigma: f32) -> RgbaImage {
    let (w, h) = (input.width() as usize, input.height() as usize);
    let radii = box_radii(sigma);

    let mut buf: Vec<f32> = input.as_raw().iter().map(|&v| v as f32).collect();
    for radius in radii {
        box_rows(&mut buf, w, radius);
    }
    let mut buf = transpose(&buf, w, h);
    for radius in radii {
        box_rows(&mut buf, h, radius);
    }
    let buf = transpose(&buf, h, w);

    let mut output = input.clone();
    let out: &mut [u8] = &mut output;
    out.par_iter_mut()
        .zip(buf.par_iter())
        .for_each(|(o, v)| *o = v.round().clamp(0.0, 255.0) as u8);
    output
}

/// Box-average every row of an RGBA f32 buffer in place, edges clamped.
fn box_rows(buf: &mut [f32], width: usize, radius: usize) {
    if radius == 0 {
        return;
    }
    let norm = 1.0 / (2 * radius + 1) as f32;
    let last = width as i64 - 1;
    let r = radius as i64;

    buf.par_chunks_mut(width * 4).for_each(|row| {
        let src = row.to_vec();
        let at = |x: i64, c: usize| src[x.clamp(0, last) as usize * 4 + c];

        for c in 0..4 {
            let mut sum: f32 = (-r..=r).map(|k| at(k, c)).sum();
            for x in 0..=last {
                row[x as usize * 4 + c] = sum * norm;
                sum += at(x + r + 1, c) - at(x - r, c);
            }
        }
    });
}

/// Swap rows and columns of a `width` x `height` RGBA f32 buffer.
fn transpose(buf: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0; buf.len()];
    out.par_chunks_mut(height * 4)
        .enumerate()
        .for_each(|(x, column)| {
            for y in 0..height {
                let s = (y * width + x) * 4;
                column[y * 4..y * 4 + 4].copy_from_slice(&buf[s..s + 4]);
            }
        });
    out
}

/// Simple hash for deterministic jitter.
#[inline]
pub(crate) fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Hash a grid coordinate to [0, 1).
#[inline]
pub(crate) fn hash_unit(x: u32, y: u32, seed: u32) -> f32 {
    let h = hash_u32(
        x.wrapping_mul(374761393)
            .wrapping_add(y.wrapping_mul(668265263))
            .wrapping_add(seed),
    );
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(from_unit(to_unit(0)), 0);
        assert_eq!(from_unit(to_unit(255)), 255);
        assert_eq!(from_unit(to_unit(128)), 128);
        assert_eq!(from_unit(2.0), 255);
        assert_eq!(from_unit(-1.0), 0);
    }

    #[test]
    fn test_map_pixels_visits_every_pixel() {
        let input = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let output = map_pixels(&input, |x, y, p| [x as u8, y as u8, p[2], p[3]]);
        assert_eq!(output.get_pixel(2, 1).0, [2, 1, 3, 4]);
        assert_eq!(output.get_pixel(0, 0).0, [0, 0, 3, 4]);
    }

    #[test]
    fn test_map_pixels_empty() {
        let input = RgbaImage::new(0, 0);
        let output = map_pixels(&input, |_, _, p| p);
        assert_eq!(output.dimensions(), (0, 0));
    }

    #[test]
    fn test_sample_clamped() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(1, 1, Rgba([9, 9, 9, 9]));
        assert_eq!(sample_clamped(&image, 5, 7), [9, 9, 9, 9]);
        assert_eq!(sample_clamped(&image, -3, -3), [0, 0, 0, 0]);
    }

    #[test]
    fn test_gaussian_zero_sigma_is_identity() {
        let image = RgbaImage::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]));
        assert_eq!(gaussian(&image, 0.0), image);
        assert_eq!(gaussian(&image, f32::NAN), image);
    }

    #[test]
    fn test_box_radii_grow_with_sigma() {
        let small = box_radii(5.0);
        let large = box_radii(200.0);
        assert!(small.iter().all(|&r| r >= 1));
        assert!(large.iter().zip(small.iter()).all(|(l, s)| l > s));
        assert!(large.iter().all(|&r| (195..=205).contains(&r)), "{:?}", large);
    }

    #[test]
    fn test_wide_gaussian_keeps_flat_image() {
        let image = RgbaImage::from_pixel(17, 11, Rgba([90, 120, 150, 200]));
        assert_eq!(gaussian(&image, 150.0), image);
    }

    #[test]
    fn test_wide_gaussian_tracks_exact_kernel() {
        let image = RgbaImage::from_fn(64, 4, |x, _| {
            if x < 32 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let sigma = 6.0;
        let exact = imageproc::filter::gaussian_blur_f32(&image, sigma);
        let approx = box_gaussian(&image, sigma);

        assert_eq!(approx.dimensions(), image.dimensions());
        for x in 16..48 {
            let a = approx.get_pixel(x, 2).0[0] as i16;
            let e = exact.get_pixel(x, 2).0[0] as i16;
            assert!((a - e).abs() <= 16, "x = {}: {} vs {}", x, a, e);
        }
    }

    #[test]
    fn test_wide_gaussian_is_fast_on_large_images() {
        let image = RgbaImage::from_fn(1200, 900, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 77, 255]));
        let start = std::time::Instant::now();
        let output = gaussian(&image, 200.0);
        assert_eq!(output.dimensions(), (1200, 900));
        assert!(start.elapsed() < std::time::Duration::from_secs(3), "{:?}", start.elapsed());
    }

    #[test]
    fn test_hash_unit_range_and_determinism() {
        for i in 0..100 {
            let v = hash_unit(i, i * 3, 7);
            assert!((0.0..1.0).contains(&v));
            assert_eq!(v, hash_unit(i, i * 3, 7));
        }
    }
}
