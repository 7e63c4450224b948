//! Filesystem adapter for decoding and encoding images.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageFormat};
use pano_core::ports::ImageCodec;
use pano_core::Image;
use tracing::debug;

/// Raster extensions the codec reads and writes.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Image codec backed by the `image` crate.
///
/// Paths without an extension are written as PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCodec;

impl FsCodec {
    /// Creates a new filesystem codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageCodec for FsCodec {
    fn decode(&self, path: &Path) -> Result<Image> {
        let pixels =
            image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;
        debug!(
            "Decoded {} ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );
        Ok(Image::new(path.display().to_string(), pixels))
    }

    fn encode(&self, image: &Image, path: &Path) -> Result<()> {
        let Some(pixels) = image.pixels().filter(|_| image.is_valid()) else {
            bail!("Cannot save an empty image to {}", path.display());
        };

        let format = match ImageFormat::from_path(path) {
            Ok(format) => format,
            Err(_) if path.extension().is_none() => ImageFormat::Png,
            Err(e) => {
                return Err(e).with_context(|| format!("Unknown image format: {}", path.display()))
            }
        };

        // JPEG has no alpha channel.
        let pixels = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(pixels.to_rgb8())
        } else {
            pixels.clone()
        };

        pixels
            .save_with_format(path, format)
            .with_context(|| format!("Failed to write image: {}", path.display()))
    }
}

/// Checks if a path has a supported raster extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.as_str()))
}
