//! Image values that flow through the render pipeline.
//!
//! A [`SourceImage`] is bound once per photo pick and never mutated. A
//! [`RenderedImage`] is produced by every render and remembers exactly which
//! filter, intensity and resolved parameters made it.

use crate::core::filter::FilterKind;
use crate::core::param::{FilterParameters, Intensity};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Image format
    pub format: ImageFormat,
    /// Whether the image has an alpha channel
    pub has_alpha: bool,
}

/// Where a source image came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "origin", content = "value")]
pub enum ImageOrigin {
    /// Picked from a file on disk
    FilePath(PathBuf),
    /// Decoded from an in-memory buffer handed over by a picker
    Bytes,
    /// Created in memory (no external reference)
    InMemory,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Gif,
    WebP,
    #[serde(alias = "tif")]
    Tiff,
    Bmp,
    Unknown,
}

/// Immutable input raster, bound once per photo selection.
///
/// Pixel data is shared through an `Arc`, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Image metadata (dimensions, format, etc.)
    pub metadata: ImageMetadata,
    /// Where the pixels came from
    pub origin: ImageOrigin,
    data: Arc<DynamicImage>,
}

/// Output raster of one render.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pixels: Arc<RgbaImage>,
    /// Filter that produced this image
    pub filter: FilterKind,
    /// Intensity the parameters were derived from
    pub intensity: Intensity,
    /// Parameters the filter was executed with
    pub parameters: FilterParameters,
    /// Wall time spent inside the filter
    pub elapsed: Duration,
}

// ============================================================================
// SourceImage Implementation
// ============================================================================

fn has_alpha(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

impl SourceImage {
    /// Create a new SourceImage from a DynamicImage.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            metadata: ImageMetadata {
                width: image.width(),
                height: image.height(),
                format: ImageFormat::Unknown,
                has_alpha: has_alpha(&image),
            },
            origin: ImageOrigin::InMemory,
            data: Arc::new(image),
        }
    }

    /// Load a photo from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, image::ImageError> {
        let path = path.into();
        let image = image::open(&path)?;

        Ok(Self {
            metadata: ImageMetadata {
                width: image.width(),
                height: image.height(),
                format: ImageFormat::from_path(&path),
                has_alpha: has_alpha(&image),
            },
            origin: ImageOrigin::FilePath(path),
            data: Arc::new(image),
        })
    }

    /// Decode a photo from an encoded buffer (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;

        Ok(Self {
            metadata: ImageMetadata {
                width: image.width(),
                height: image.height(),
                format: ImageFormat::from_image_format(format),
                has_alpha: has_alpha(&image),
            },
            origin: ImageOrigin::Bytes,
            data: Arc::new(image),
        })
    }

    /// Get a shared reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.data
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.metadata.width, self.metadata.height)
    }

    /// Whether the image covers no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.metadata.width == 0 || self.metadata.height == 0
    }
}

// ============================================================================
// RenderedImage Implementation
// ============================================================================

impl RenderedImage {
    pub(crate) fn new(
        pixels: RgbaImage,
        filter: FilterKind,
        intensity: Intensity,
        parameters: FilterParameters,
        elapsed: Duration,
    ) -> Self {
        Self {
            pixels: Arc::new(pixels),
            filter,
            intensity,
            parameters,
            elapsed,
        }
    }

    /// The rendered pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Shared handle to the rendered pixels, for handing to another thread.
    pub fn shared_pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Copy the rendered pixels into a DynamicImage.
    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8((*self.pixels).clone())
    }

    /// Write the rendered image to a path, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        let path = path.as_ref();
        match ImageFormat::from_path(path) {
            // JPEG has no alpha channel
            ImageFormat::Jpeg => self.to_dynamic().to_rgb8().save(path),
            _ => self.pixels.save(path),
        }
    }
}

// ============================================================================
// ImageFormat Implementation
// ============================================================================

impl ImageFormat {
    /// Determine image format from file path extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert from the image crate's ImageFormat.
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => ImageFormat::Jpeg,
            image::ImageFormat::Png => ImageFormat::Png,
            image::ImageFormat::Gif => ImageFormat::Gif,
            image::ImageFormat::WebP => ImageFormat::WebP,
            image::ImageFormat::Tiff => ImageFormat::Tiff,
            image::ImageFormat::Bmp => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert to image crate's ImageFormat.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Unknown => None,
        }
    }

    /// Get the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Unknown => "bin",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::WebP => write!(f, "WebP"),
            ImageFormat::Tiff => write!(f, "TIFF"),
            ImageFormat::Bmp => write!(f, "BMP"),
            ImageFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.JPG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("photo.tif")), ImageFormat::Tiff);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), ImageFormat::Unknown);
    }

    #[test]
    fn test_source_from_memory() {
        let source = SourceImage::new(solid(4, 3));
        assert_eq!(source.dimensions(), (4, 3));
        assert!(source.metadata.has_alpha);
        assert_eq!(source.origin, ImageOrigin::InMemory);
        assert!(!source.is_empty());
    }

    #[test]
    fn test_source_from_bytes() {
        let mut encoded = Vec::new();
        solid(5, 2)
            .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let source = SourceImage::from_bytes(&encoded).unwrap();
        assert_eq!(source.dimensions(), (5, 2));
        assert_eq!(source.metadata.format, ImageFormat::Png);
        assert_eq!(source.origin, ImageOrigin::Bytes);
    }

    #[test]
    fn test_source_from_garbage_bytes() {
        assert!(SourceImage::from_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn test_format_serde_aliases() {
        let format: ImageFormat = serde_json::from_str("\"jpg\"").unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        let format: ImageFormat = serde_json::from_str("\"webp\"").unwrap();
        assert_eq!(format, ImageFormat::WebP);
    }
}
