//! Synthetic image builders for testing.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use pano_core::domain::Image;

/// Builder for creating synthetic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a uniform mid-gray RGB image with the given source label.
    #[must_use]
    pub fn labelled(source: &str, width: u32, height: u32) -> Image {
        Self::rgb_uniform(source, width, height, [128, 128, 128])
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(source: &str, width: u32, height: u32, rgb: [u8; 3]) -> Image {
        let img = RgbImage::from_pixel(width, height, Rgb(rgb));
        Image::new(source, DynamicImage::ImageRgb8(img))
    }

    /// Creates a high-contrast checkerboard.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> Image {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        Image::new("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    /// Creates a wide, non-repeating texture to cut overlapping views from.
    ///
    /// Every column differs from its neighbours, so a translation between
    /// two crops has a single best alignment.
    #[must_use]
    pub fn scene(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = texture(x, y);
            Rgb([v, v.wrapping_mul(3).wrapping_add(17), v ^ 0x5a])
        })
    }

    /// Cuts a `width`-wide vertical slice starting at column `x` from `scene`.
    #[must_use]
    pub fn view(scene: &RgbImage, x: u32, width: u32, source: &str) -> Image {
        let crop = image::imageops::crop_imm(scene, x, 0, width, scene.height()).to_image();
        Image::new(source, DynamicImage::ImageRgb8(crop))
    }

    /// Creates `count` overlapping views of one scene, left to right.
    ///
    /// Each view is `width` wide and starts `step` columns after the previous.
    #[must_use]
    pub fn overlapping_views(count: u32, width: u32, step: u32, height: u32) -> Vec<Image> {
        let scene = Self::scene(width + step * count.saturating_sub(1), height);
        (0..count)
            .map(|i| Self::view(&scene, i * step, width, &format!("view-{i}")))
            .collect()
    }
}

/// Pseudo-random but deterministic intensity for pixel `(x, y)`.
#[allow(clippy::cast_possible_truncation)]
fn texture(x: u32, y: u32) -> u8 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    (h & 0xff) as u8
}
