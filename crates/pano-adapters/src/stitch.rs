//! Translation-only panorama stitching.
//!
//! Consecutive images are aligned by searching the horizontal (and a small
//! vertical) offset that minimises the mean absolute luminance difference of
//! their overlap. The search runs on downscaled grayscale copies; the
//! composite is built at full resolution with a linear feather across seams.
//!
//! This handles sweeps shot with a steady, rotating or sliding camera and
//! short focal lengths. Strong perspective needs the `opencv` stitcher.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use pano_core::ports::Stitcher;
use pano_core::{Image, ImageSet, StitchOutcome};
use tracing::{debug, info};

/// Default minimum overlap, as a fraction of the narrower image.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.1;

/// Default largest mean luminance difference accepted for an overlap.
pub const DEFAULT_MAX_ERROR: f64 = 24.0;

/// Height of the grayscale copies the offset search runs on.
const WORK_HEIGHT: u32 = 120;

/// Offset of one image relative to its left neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Horizontal offset in pixels.
    pub dx: i64,
    /// Vertical offset in pixels.
    pub dy: i64,
    /// Mean absolute luminance difference over the overlap.
    pub error: f64,
}

/// Stitches left-to-right image sequences by pure translation.
///
/// Each image must continue its predecessor to the right: only
/// non-negative horizontal offsets are searched, so a right-to-left sweep
/// ends in [`StitchOutcome::InsufficientOverlap`]. Reverse the inputs first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationStitcher {
    min_overlap: f64,
    max_error: f64,
}

impl Default for TranslationStitcher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_OVERLAP, DEFAULT_MAX_ERROR)
    }
}

impl TranslationStitcher {
    /// Creates a stitcher.
    ///
    /// `min_overlap` is clamped to `0..=1`.
    #[must_use]
    pub fn new(min_overlap: f64, max_error: f64) -> Self {
        Self {
            min_overlap: min_overlap.clamp(0.0, 1.0),
            max_error,
        }
    }

    /// Finds where `right` sits relative to `left`.
    ///
    /// Returns `None` if the images are too narrow to overlap by the
    /// configured minimum.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn estimate_offset(&self, left: &GrayImage, right: &GrayImage) -> Option<Alignment> {
        let (wa, ha) = (i64::from(left.width()), i64::from(left.height()));
        let (wb, hb) = (i64::from(right.width()), i64::from(right.height()));
        let min_cols = ((wa.min(wb) as f64 * self.min_overlap).ceil() as i64).max(1);
        let min_rows = (ha.min(hb) / 2).max(1);
        let max_dy = (ha.min(hb) / 20).max(1);

        // Level placements win ties.
        let dys: Vec<i64> = std::iter::once(0)
            .chain((1..=max_dy).flat_map(|d| [-d, d]))
            .collect();

        let mut best: Option<Alignment> = None;
        for dx in 0..=(wa - min_cols) {
            for &dy in &dys {
                let cols = (dx, wa.min(dx + wb));
                let rows = (dy.max(0), ha.min(dy + hb));
                if cols.1 - cols.0 < min_cols || rows.1 - rows.0 < min_rows {
                    continue;
                }

                let error = mean_abs_diff(left, right, cols, rows, (dx, dy));
                if best.map_or(true, |b| error < b.error) {
                    best = Some(Alignment { dx, dy, error });
                }
            }
        }
        best
    }
}

impl Stitcher for TranslationStitcher {
    fn name(&self) -> &'static str {
        "translation"
    }

    fn stitch(&self, images: &ImageSet) -> StitchOutcome {
        if images.len() < 2 {
            return StitchOutcome::Failed(format!(
                "need at least 2 images, got {}",
                images.len()
            ));
        }

        let frames = match normalise(images) {
            Ok(frames) => frames,
            Err(reason) => return StitchOutcome::Failed(reason),
        };

        let height = frames.first().map_or(1, RgbImage::height);
        let scale = (f64::from(WORK_HEIGHT) / f64::from(height)).min(1.0);
        let work: Vec<GrayImage> = frames.iter().map(|f| work_copy(f, scale)).collect();

        let mut positions = vec![(0i64, 0i64)];
        for (i, pair) in work.windows(2).enumerate() {
            let Some(alignment) = self.estimate_offset(&pair[0], &pair[1]) else {
                debug!("Images {i} and {} are too narrow to overlap", i + 1);
                return StitchOutcome::InsufficientOverlap;
            };
            if alignment.error > self.max_error {
                debug!(
                    "Images {i} and {} do not overlap (best error {:.1} > {:.1})",
                    i + 1,
                    alignment.error,
                    self.max_error
                );
                return StitchOutcome::InsufficientOverlap;
            }

            debug!(
                "Image {} at +{}/{:+} (error {:.1})",
                i + 1,
                alignment.dx,
                alignment.dy,
                alignment.error
            );
            let (x, y) = positions.last().copied().unwrap_or_default();
            positions.push((x + upscale(alignment.dx, scale), y + upscale(alignment.dy, scale)));
        }

        match composite(&frames, &positions) {
            Some(panorama) => {
                info!(
                    "Stitched {} images into {}x{}",
                    frames.len(),
                    panorama.width(),
                    panorama.height()
                );
                StitchOutcome::Success(Image::new("panorama", DynamicImage::ImageRgb8(panorama)))
            }
            None => StitchOutcome::Failed("aligned images share no common rows".to_string()),
        }
    }
}

/// Converts every image to RGB at the height of the first one.
fn normalise(images: &ImageSet) -> Result<Vec<RgbImage>, String> {
    let mut frames: Vec<RgbImage> = Vec::with_capacity(images.len());
    for (index, image) in images.iter().enumerate() {
        let Some(pixels) = image.pixels().filter(|_| image.is_valid()) else {
            return Err(format!("image {index} ({}) has no pixels", image.source));
        };
        let rgb = pixels.to_rgb8();

        let target = frames.first().map_or(rgb.height(), RgbImage::height);
        if rgb.height() == target {
            frames.push(rgb);
        } else {
            let width = u64::from(rgb.width()) * u64::from(target) / u64::from(rgb.height());
            let width = u32::try_from(width.max(1)).unwrap_or(u32::MAX);
            frames.push(imageops::resize(&rgb, width, target, FilterType::Triangle));
        }
    }
    Ok(frames)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn work_copy(frame: &RgbImage, scale: f64) -> GrayImage {
    let gray = imageops::grayscale(frame);
    if scale >= 1.0 {
        return gray;
    }
    let width = ((f64::from(gray.width()) * scale).round() as u32).max(1);
    let height = ((f64::from(gray.height()) * scale).round() as u32).max(1);
    imageops::resize(&gray, width, height, FilterType::Triangle)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn upscale(value: i64, scale: f64) -> i64 {
    (value as f64 / scale).round() as i64
}

/// Mean absolute difference over `cols` x `rows` of `left`, with `right`
/// shifted by `offset`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn mean_abs_diff(
    left: &GrayImage,
    right: &GrayImage,
    cols: (i64, i64),
    rows: (i64, i64),
    offset: (i64, i64),
) -> f64 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for y in rows.0..rows.1 {
        for x in cols.0..cols.1 {
            let a = left.get_pixel(x as u32, y as u32).0[0];
            let b = right
                .get_pixel((x - offset.0) as u32, (y - offset.1) as u32)
                .0[0];
            sum += u64::from(a.abs_diff(b));
            count += 1;
        }
    }
    if count == 0 {
        return f64::INFINITY;
    }
    sum as f64 / count as f64
}

/// Blends `frames` placed at `positions`, cropped to the rows all share.
///
/// Each pixel is weighted by its distance to the nearest vertical edge of
/// its frame, so seams fade linearly.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn composite(frames: &[RgbImage], positions: &[(i64, i64)]) -> Option<RgbImage> {
    let placed = || frames.iter().zip(positions);
    let top = placed().map(|(_, p)| p.1).max()?;
    let bottom = placed().map(|(f, p)| p.1 + i64::from(f.height())).min()?;
    let left = placed().map(|(_, p)| p.0).min()?;
    let right = placed().map(|(f, p)| p.0 + i64::from(f.width())).max()?;
    if bottom <= top || right <= left {
        return None;
    }

    let width = u32::try_from(right - left).ok()?;
    let height = u32::try_from(bottom - top).ok()?;
    let stride = width as usize;
    let mut sums = vec![[0f32; 3]; stride * height as usize];
    let mut weights = vec![0f32; stride * height as usize];

    for (frame, &(px, py)) in placed() {
        let frame_width = frame.width();
        for (x, y, pixel) in frame.enumerate_pixels() {
            let cy = py + i64::from(y) - top;
            if cy < 0 || cy >= i64::from(height) {
                continue;
            }
            let cx = px + i64::from(x) - left;
            let idx = cy as usize * stride + cx as usize;

            let weight = (x.min(frame_width - 1 - x) + 1) as f32;
            for (sum, channel) in sums[idx].iter_mut().zip(pixel.0) {
                *sum += weight * f32::from(channel);
            }
            weights[idx] += weight;
        }
    }

    Some(RgbImage::from_fn(width, height, |x, y| {
        let idx = y as usize * stride + x as usize;
        let weight = weights[idx];
        if weight <= 0.0 {
            return Rgb([0, 0, 0]);
        }
        Rgb(sums[idx].map(|s| (s / weight).round().clamp(0.0, 255.0) as u8))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn ramp(width: u32, height: u32, start: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([u8::try_from(((x + start) * 7 + y * 3) % 251).unwrap_or(0)])
        })
    }

    #[test]
    fn test_estimate_offset_finds_shift() {
        let scene = ramp(60, 20, 0);
        let left = imageops::crop_imm(&scene, 0, 0, 40, 20).to_image();
        let right = imageops::crop_imm(&scene, 18, 0, 40, 20).to_image();

        let alignment = TranslationStitcher::default().estimate_offset(&left, &right);
        let alignment = alignment.unwrap_or_else(|| panic!("images overlap"));
        assert_eq!((alignment.dx, alignment.dy), (18, 0));
        assert!(alignment.error < f64::EPSILON);
    }

    #[test]
    fn test_estimate_offset_needs_minimum_width() {
        let stitcher = TranslationStitcher::new(1.0, DEFAULT_MAX_ERROR);
        let left = ramp(10, 10, 0);
        let right = ramp(20, 10, 0);
        // Full overlap of the narrower image is still possible at dx = 0.
        assert!(stitcher.estimate_offset(&left, &right).is_some());
        assert!(stitcher.estimate_offset(&GrayImage::new(0, 10), &right).is_none());
    }

    #[test]
    fn test_composite_feathers_seam() {
        let dark = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
        let light = RgbImage::from_pixel(4, 2, Rgb([200, 200, 200]));
        let panorama = composite(&[dark, light], &[(0, 0), (2, 0)])
            .unwrap_or_else(|| panic!("frames share rows"));

        assert_eq!(panorama.dimensions(), (6, 2));
        assert_eq!(panorama.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(panorama.get_pixel(5, 0), &Rgb([200, 200, 200]));
        // Column 2: dark weight 2, light weight 1.
        assert_eq!(panorama.get_pixel(2, 0).0[0], 67);
    }

    #[test]
    fn test_composite_crops_to_common_rows() {
        let a = RgbImage::new(4, 10);
        let b = RgbImage::new(4, 10);
        let panorama = composite(&[a, b], &[(0, 0), (3, 2)])
            .unwrap_or_else(|| panic!("frames share rows"));
        assert_eq!(panorama.dimensions(), (7, 8));
    }
}
