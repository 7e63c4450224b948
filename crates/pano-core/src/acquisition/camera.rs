//! Live capture from a camera, driven by key presses in a preview window.

use std::time::Duration;

use image::Rgb;
use tracing::{debug, info, warn};

use crate::domain::{Image, ImageSet};
use crate::ports::{
    CaptureDevices, Display, FrameStream, Key, PreviewWindow, ProgressEvent, ProgressSink,
    TextOverlay,
};

/// Instruction drawn on every preview frame.
pub const CAPTURE_HINT: &str = "Press RETURN to capture frame or ESC to exit";

/// Title of the live preview window.
pub const CAMERA_WINDOW: &str = "Camera feed";

const HINT_OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);
const HINT_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// State of a live capture session.
pub enum CaptureState<'d> {
    /// The camera has not been opened yet.
    Opening,
    /// Frames are being previewed; the user decides which to keep.
    Streaming {
        /// The open camera.
        stream: Box<dyn FrameStream + 'd>,
        /// The preview window.
        window: Box<dyn PreviewWindow + 'd>,
    },
    /// The camera and window are released.
    Closed,
}

impl CaptureState<'_> {
    /// Returns `true` once the session has ended.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Interactive frame capture.
///
/// RETURN keeps the current frame, ESCAPE ends the session. Frames are never
/// captured without a key press.
pub struct LiveCapture<'a> {
    devices: &'a dyn CaptureDevices,
    display: &'a dyn Display,
    progress: &'a dyn ProgressSink,
    device_index: u32,
    key_timeout: Duration,
}

impl<'a> LiveCapture<'a> {
    /// Creates a capture session for camera `device_index`.
    #[must_use]
    pub fn new(
        devices: &'a dyn CaptureDevices,
        display: &'a dyn Display,
        progress: &'a dyn ProgressSink,
        device_index: u32,
    ) -> Self {
        Self {
            devices,
            display,
            progress,
            device_index,
            key_timeout: Duration::from_millis(1),
        }
    }

    /// Sets how long each cycle waits for a key.
    #[must_use]
    pub const fn with_key_timeout(mut self, key_timeout: Duration) -> Self {
        self.key_timeout = key_timeout;
        self
    }

    /// Runs the session until ESCAPE or end of stream.
    #[must_use]
    pub fn run(&self) -> ImageSet {
        self.progress.on_event(ProgressEvent::Started {
            source: "camera".to_string(),
            total: None,
        });

        let mut images = ImageSet::new();
        let mut state = CaptureState::Opening;
        while !state.is_closed() {
            state = self.step(state, &mut images);
        }

        info!("Finished taking images ({} captured)", images.len());
        self.progress.on_event(ProgressEvent::Finished {
            acquired: images.len(),
            failed: 0,
        });
        images
    }

    /// Advances the state machine by one transition.
    pub fn step(&self, state: CaptureState<'a>, images: &mut ImageSet) -> CaptureState<'a> {
        match state {
            CaptureState::Opening => self.open(),
            CaptureState::Streaming { stream, window } => self.cycle(stream, window, images),
            CaptureState::Closed => CaptureState::Closed,
        }
    }

    fn open(&self) -> CaptureState<'a> {
        let stream = match self.devices.open_camera(self.device_index) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Camera {} unavailable: {e:#}", self.device_index);
                return CaptureState::Closed;
            }
        };

        match self.display.open_preview(CAMERA_WINDOW) {
            Ok(window) => {
                debug!("Camera {} opened", self.device_index);
                CaptureState::Streaming { stream, window }
            }
            Err(e) => {
                warn!("No preview window for live capture: {e:#}");
                drop(stream);
                CaptureState::Closed
            }
        }
    }

    fn cycle(
        &self,
        mut stream: Box<dyn FrameStream + 'a>,
        mut window: Box<dyn PreviewWindow + 'a>,
        images: &mut ImageSet,
    ) -> CaptureState<'a> {
        let Some(frame) = stream.read_frame() else {
            debug!("Camera stream ended");
            return close(stream, window);
        };

        let preview = self.annotate(&frame);
        if let Err(e) = window.present(&preview) {
            warn!("Failed to show preview frame: {e:#}");
        }

        match window.poll_key(self.key_timeout) {
            Some(Key::Return) => {
                info!("Adding frame...");
                self.progress.on_event(ProgressEvent::Acquired {
                    index: images.len(),
                    label: frame.source.clone(),
                });
                images.push(frame);
                CaptureState::Streaming { stream, window }
            }
            Some(Key::Escape) => close(stream, window),
            Some(Key::Other(_)) | None => CaptureState::Streaming { stream, window },
        }
    }

    /// Draws the capture hint on a copy of `frame`: dark outline, then light fill.
    fn annotate(&self, frame: &Image) -> Image {
        let baseline = i32::try_from(frame.height).unwrap_or(i32::MAX) - 30;
        let pass = |image: &Image, color, thickness| {
            self.display.overlay_text(
                image,
                &TextOverlay {
                    text: CAPTURE_HINT,
                    origin: (20, baseline),
                    color,
                    thickness,
                },
            )
        };

        let outlined = pass(frame, HINT_OUTLINE, 3);
        pass(&outlined, HINT_FILL, 1)
    }
}

/// Releases the camera, then dismisses the window.
fn close<'d>(
    stream: Box<dyn FrameStream + 'd>,
    window: Box<dyn PreviewWindow + 'd>,
) -> CaptureState<'d> {
    drop(stream);
    drop(window);
    CaptureState::Closed
}
