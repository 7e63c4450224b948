//! OpenCV backends: cameras, video containers, HighGUI windows and the
//! feature-based panorama stitcher.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, RgbImage};
use opencv::core::{Mat, Point, Scalar, Vector};
use opencv::prelude::*;
use opencv::stitching::{Stitcher as CvStitcher, Stitcher_Mode, Stitcher_Status};
use opencv::{highgui, imgproc, videoio};
use pano_core::ports::{
    CaptureDevices, Display, FrameStream, Key, PreviewWindow, SeekableStream, Stitcher,
    TextOverlay,
};
use pano_core::{Image, ImageSet, StitchOutcome};
use tracing::{debug, warn};

/// Hershey face and scale used for overlay text.
const OVERLAY_FONT: i32 = imgproc::FONT_HERSHEY_COMPLEX_SMALL;
const OVERLAY_SCALE: f64 = 1.0;

/// Converts a BGR frame to an owned image.
fn from_mat(mat: &Mat, source: String) -> Result<Image> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(mat, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let rgb = if rgb.is_continuous() { rgb } else { rgb.try_clone()? };

    let width = u32::try_from(rgb.cols()).context("negative frame width")?;
    let height = u32::try_from(rgb.rows()).context("negative frame height")?;
    let buffer = RgbImage::from_raw(width, height, rgb.data_bytes()?.to_vec())
        .context("frame buffer size does not match its dimensions")?;
    Ok(Image::new(source, DynamicImage::ImageRgb8(buffer)))
}

/// Converts an image to a BGR matrix.
fn to_mat(image: &Image) -> Result<Mat> {
    let Some(pixels) = image.pixels().filter(|_| image.is_valid()) else {
        bail!("{} has no pixels", image.source);
    };
    let rgb = pixels.to_rgb8();
    let rows = i32::try_from(rgb.height())?;

    let flat = Mat::from_slice(rgb.as_raw())?;
    let shaped = flat.reshape(3, rows)?;
    let mut bgr = Mat::default();
    imgproc::cvt_color(&*shaped, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
    Ok(bgr)
}

// === Capture ===

/// Cameras and video files through `cv::VideoCapture`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpencvDevices;

impl CaptureDevices for OpencvDevices {
    fn open_camera(&self, index: u32) -> Result<Box<dyn FrameStream + '_>> {
        let capture = videoio::VideoCapture::new(i32::try_from(index)?, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            bail!("Camera {index} could not be opened");
        }
        Ok(Box::new(CvStream {
            capture,
            label: format!("camera:{index}"),
            position: 0,
            frame_count: 0,
        }))
    }

    fn open_video(&self, path: &Path) -> Result<Box<dyn SeekableStream + '_>> {
        let name = path.to_str().context("video path is not valid UTF-8")?;
        let capture = videoio::VideoCapture::from_file(name, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            bail!("Video {} could not be opened", path.display());
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as usize;
        Ok(Box::new(CvStream {
            capture,
            label: name.to_string(),
            position: 0,
            frame_count,
        }))
    }
}

struct CvStream {
    capture: videoio::VideoCapture,
    label: String,
    position: usize,
    frame_count: usize,
}

impl FrameStream for CvStream {
    fn read_frame(&mut self) -> Option<Image> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => return None,
            Err(e) => {
                warn!("Failed to read from {}: {e}", self.label);
                return None;
            }
        }

        let source = if self.frame_count == 0 {
            format!("{}#{}", self.label, self.position)
        } else {
            format!("{}@{}", self.label, self.position)
        };
        self.position += 1;
        from_mat(&frame, source)
            .map_err(|e| warn!("Failed to convert frame: {e:#}"))
            .ok()
    }
}

impl SeekableStream for CvStream {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[allow(clippy::cast_precision_loss)]
    fn seek(&mut self, position: usize) -> Result<()> {
        if !self
            .capture
            .set(videoio::CAP_PROP_POS_FRAMES, position as f64)?
        {
            bail!("{} does not support seeking", self.label);
        }
        self.position = position;
        Ok(())
    }
}

impl Drop for CvStream {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release {}: {e}", self.label);
        }
        debug!("Released {}", self.label);
    }
}

// === Display ===

/// HighGUI windows and Hershey text.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpencvDisplay;

impl Display for OpencvDisplay {
    fn show(&self, image: &Image, label: &str) -> Result<()> {
        let mat = to_mat(image)?;
        highgui::named_window(label, highgui::WINDOW_AUTOSIZE)?;
        highgui::imshow(label, &mat)?;
        highgui::wait_key(0)?;
        highgui::destroy_window(label)?;
        Ok(())
    }

    fn open_preview(&self, label: &str) -> Result<Box<dyn PreviewWindow + '_>> {
        highgui::named_window(label, highgui::WINDOW_AUTOSIZE)?;
        Ok(Box::new(CvWindow {
            label: label.to_string(),
        }))
    }

    fn overlay_text(&self, image: &Image, overlay: &TextOverlay<'_>) -> Image {
        let draw = || -> Result<Image> {
            let mut mat = to_mat(image)?;
            let [r, g, b] = overlay.color.0;
            imgproc::put_text(
                &mut mat,
                overlay.text,
                Point::new(overlay.origin.0, overlay.origin.1),
                OVERLAY_FONT,
                OVERLAY_SCALE,
                Scalar::new(f64::from(b), f64::from(g), f64::from(r), 0.0),
                i32::try_from(overlay.thickness)?,
                imgproc::LINE_8,
                false,
            )?;
            from_mat(&mat, image.source.clone())
        };
        draw().unwrap_or_else(|e| {
            warn!("Failed to draw text on {}: {e:#}", image.source);
            image.clone()
        })
    }
}

struct CvWindow {
    label: String,
}

impl PreviewWindow for CvWindow {
    fn present(&mut self, frame: &Image) -> Result<()> {
        highgui::imshow(&self.label, &to_mat(frame)?)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<Key> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX).max(1);
        match highgui::wait_key(millis) {
            Ok(code) => Key::from_code(code),
            Err(e) => {
                warn!("Failed to poll keys: {e}");
                None
            }
        }
    }
}

impl Drop for CvWindow {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.label) {
            warn!("Failed to close {}: {e}", self.label);
        }
    }
}

// === Stitching ===

/// `cv::Stitcher` in panorama mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpencvStitcher;

impl OpencvStitcher {
    fn run(images: &ImageSet) -> Result<StitchOutcome> {
        let mut inputs = Vector::<Mat>::new();
        for image in images {
            inputs.push(to_mat(image)?);
        }

        let mut stitcher = CvStitcher::create(Stitcher_Mode::PANORAMA)?;
        let mut panorama = Mat::default();
        let outcome = match stitcher.stitch(&inputs, &mut panorama)? {
            Stitcher_Status::OK => StitchOutcome::Success(from_mat(&panorama, "panorama".into())?),
            Stitcher_Status::ERR_NEED_MORE_IMGS => StitchOutcome::InsufficientOverlap,
            Stitcher_Status::ERR_HOMOGRAPHY_EST_FAIL => {
                StitchOutcome::Failed("homography estimation failed".to_string())
            }
            Stitcher_Status::ERR_CAMERA_PARAMS_ADJUST_FAIL => {
                StitchOutcome::Failed("camera parameter adjustment failed".to_string())
            }
        };
        Ok(outcome)
    }
}

impl Stitcher for OpencvStitcher {
    fn name(&self) -> &'static str {
        "opencv"
    }

    fn stitch(&self, images: &ImageSet) -> StitchOutcome {
        Self::run(images).unwrap_or_else(|e| StitchOutcome::Failed(format!("{e:#}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn test_overlay_uses_small_face() {
        let blank = Image::new(
            "frame",
            DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 40, Rgb([0, 0, 0]))),
        );
        let overlay = TextOverlay {
            text: "HINT",
            origin: (5, 30),
            color: Rgb([255, 255, 255]),
            thickness: 1,
        };

        let drawn = OpencvDisplay.overlay_text(&blank, &overlay);

        let pixels = drawn.pixels().unwrap().to_rgb8();
        let lit_rows: Vec<u32> = (0..pixels.height())
            .filter(|&y| (0..pixels.width()).any(|x| pixels.get_pixel(x, y).0[0] > 0))
            .collect();
        let span = lit_rows.last().unwrap() - lit_rows.first().unwrap() + 1;
        // The simplex face at scale 1.0 is over 20 rows tall.
        assert!(span < 18, "text spans {span} rows");
        assert_eq!(drawn.source, "frame");
        assert!(blank.pixels().unwrap().to_rgb8().pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
