//! Mock implementations of core port traits.
//!
//! Each mock shares its log through an `Arc<Mutex<_>>`, so handles it gives
//! out (streams, windows) keep recording after the mock itself is borrowed.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::bail;
use image::{DynamicImage, Rgb};
use pano_core::domain::{Image, ImageSet, StitchOutcome};
use pano_core::ports::{
    CaptureDevices, Dialogs, Display, FileSelectRequest, FrameStream, ImageCodec, Key, Notifier,
    PreviewWindow, ProgressEvent, ProgressSink, SeekableStream, Severity, Stitcher, TextOverlay,
};

use crate::SyntheticImageBuilder;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// === Capture devices ===

/// What the mock devices observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeviceLog {
    /// Times a camera was opened.
    pub camera_opens: usize,
    /// Times a video was opened.
    pub video_opens: usize,
    /// Streams dropped (camera or video).
    pub released: usize,
    /// Frames read from the camera.
    pub camera_reads: usize,
    /// Positions passed to `seek`.
    pub seeks: Vec<usize>,
    /// Video positions at which `read_frame` was called.
    pub reads: Vec<usize>,
}

/// Mock implementation of `CaptureDevices`.
///
/// The camera yields a fixed list of frames then ends. The video reports a
/// frame count and can be read up to a (possibly smaller) number of frames.
pub struct MockDevices {
    camera: Option<Vec<Image>>,
    video: Option<(usize, usize)>,
    log: Arc<Mutex<DeviceLog>>,
}

impl MockDevices {
    /// Creates devices where neither camera nor video can be opened.
    #[must_use]
    pub fn new() -> Self {
        Self {
            camera: None,
            video: None,
            log: Arc::new(Mutex::new(DeviceLog::default())),
        }
    }

    /// Creates devices with a camera that yields `frames`.
    #[must_use]
    pub fn with_camera(frames: Vec<Image>) -> Self {
        Self {
            camera: Some(frames),
            ..Self::new()
        }
    }

    /// Creates devices with a video of `frame_count` frames, all readable.
    #[must_use]
    pub fn with_video(frame_count: usize) -> Self {
        Self::with_truncated_video(frame_count, frame_count)
    }

    /// Creates devices with a video that reports `frame_count` frames but
    /// only yields the first `readable`.
    #[must_use]
    pub fn with_truncated_video(frame_count: usize, readable: usize) -> Self {
        Self {
            video: Some((frame_count, readable)),
            ..Self::new()
        }
    }

    /// Returns a snapshot of the device log.
    #[must_use]
    pub fn log(&self) -> DeviceLog {
        lock(&self.log).clone()
    }
}

impl Default for MockDevices {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevices for MockDevices {
    fn open_camera(&self, index: u32) -> anyhow::Result<Box<dyn FrameStream + '_>> {
        lock(&self.log).camera_opens += 1;
        let Some(frames) = &self.camera else {
            bail!("camera {index} not connected");
        };
        Ok(Box::new(MockCameraStream {
            frames: frames.iter().cloned().collect(),
            log: Arc::clone(&self.log),
        }))
    }

    fn open_video(&self, path: &Path) -> anyhow::Result<Box<dyn SeekableStream + '_>> {
        lock(&self.log).video_opens += 1;
        let Some((frame_count, readable)) = self.video else {
            bail!("cannot open {}", path.display());
        };
        Ok(Box::new(MockVideoStream {
            frame_count,
            readable,
            position: 0,
            log: Arc::clone(&self.log),
        }))
    }
}

struct MockCameraStream {
    frames: VecDeque<Image>,
    log: Arc<Mutex<DeviceLog>>,
}

impl FrameStream for MockCameraStream {
    fn read_frame(&mut self) -> Option<Image> {
        lock(&self.log).camera_reads += 1;
        self.frames.pop_front()
    }
}

impl Drop for MockCameraStream {
    fn drop(&mut self) {
        lock(&self.log).released += 1;
    }
}

struct MockVideoStream {
    frame_count: usize,
    readable: usize,
    position: usize,
    log: Arc<Mutex<DeviceLog>>,
}

impl FrameStream for MockVideoStream {
    fn read_frame(&mut self) -> Option<Image> {
        lock(&self.log).reads.push(self.position);
        if self.position >= self.readable {
            return None;
        }
        let frame = SyntheticImageBuilder::labelled(&format!("video@{}", self.position), 8, 8);
        self.position += 1;
        Some(frame)
    }
}

impl SeekableStream for MockVideoStream {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn seek(&mut self, position: usize) -> anyhow::Result<()> {
        lock(&self.log).seeks.push(position);
        if position > self.frame_count {
            bail!("seek past end ({position} > {})", self.frame_count);
        }
        self.position = position;
        Ok(())
    }
}

impl Drop for MockVideoStream {
    fn drop(&mut self) {
        lock(&self.log).released += 1;
    }
}

// === Display ===

/// What the mock display observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayLog {
    /// Window labels passed to `show`.
    pub shown: Vec<String>,
    /// Preview windows opened.
    pub previews_opened: usize,
    /// Preview windows dropped.
    pub previews_closed: usize,
    /// Sources of frames presented in previews.
    pub presented: Vec<String>,
    /// Overlay passes: text, colour, thickness.
    pub overlays: Vec<(String, Rgb<u8>, u32)>,
    /// Key polls.
    pub key_polls: usize,
}

/// Mock implementation of `Display`.
///
/// Preview windows answer key polls from a script; once the script runs out
/// every poll returns no key. Overlays paint the top row of a copy in the
/// overlay colour and tag its source with `+text`.
pub struct MockDisplay {
    keys: Arc<Mutex<VecDeque<Option<Key>>>>,
    preview_available: bool,
    log: Arc<Mutex<DisplayLog>>,
}

impl MockDisplay {
    /// Creates a display whose preview windows return `keys` in order.
    #[must_use]
    pub fn with_keys(keys: Vec<Option<Key>>) -> Self {
        Self {
            keys: Arc::new(Mutex::new(keys.into())),
            preview_available: true,
            log: Arc::new(Mutex::new(DisplayLog::default())),
        }
    }

    /// Creates a display that cannot open preview windows.
    #[must_use]
    pub fn headless() -> Self {
        Self {
            preview_available: false,
            ..Self::with_keys(Vec::new())
        }
    }

    /// Returns a snapshot of the display log.
    #[must_use]
    pub fn log(&self) -> DisplayLog {
        lock(&self.log).clone()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::with_keys(Vec::new())
    }
}

impl Display for MockDisplay {
    fn show(&self, _image: &Image, label: &str) -> anyhow::Result<()> {
        lock(&self.log).shown.push(label.to_string());
        Ok(())
    }

    fn open_preview(&self, label: &str) -> anyhow::Result<Box<dyn PreviewWindow + '_>> {
        if !self.preview_available {
            bail!("no display for {label}");
        }
        lock(&self.log).previews_opened += 1;
        Ok(Box::new(MockPreview {
            keys: Arc::clone(&self.keys),
            log: Arc::clone(&self.log),
        }))
    }

    fn overlay_text(&self, image: &Image, overlay: &TextOverlay<'_>) -> Image {
        lock(&self.log).overlays.push((
            overlay.text.to_string(),
            overlay.color,
            overlay.thickness,
        ));

        let Some(pixels) = image.pixels() else {
            return image.clone();
        };
        let mut rgb = pixels.to_rgb8();
        for x in 0..rgb.width() {
            rgb.put_pixel(x, 0, overlay.color);
        }
        Image::new(format!("{}+text", image.source), DynamicImage::ImageRgb8(rgb))
    }
}

struct MockPreview {
    keys: Arc<Mutex<VecDeque<Option<Key>>>>,
    log: Arc<Mutex<DisplayLog>>,
}

impl PreviewWindow for MockPreview {
    fn present(&mut self, frame: &Image) -> anyhow::Result<()> {
        lock(&self.log).presented.push(frame.source.clone());
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Option<Key> {
        lock(&self.log).key_polls += 1;
        lock(&self.keys).pop_front().flatten()
    }
}

impl Drop for MockPreview {
    fn drop(&mut self) {
        lock(&self.log).previews_closed += 1;
    }
}

// === Dialogs ===

/// Mock implementation of `Dialogs` with canned answers.
pub struct MockDialogs {
    selection: Vec<PathBuf>,
    confirm: bool,
    save_path: Option<PathBuf>,
    select_prompts: Arc<Mutex<Vec<String>>>,
    confirms: Arc<Mutex<usize>>,
    save_prompts: Arc<Mutex<usize>>,
}

impl MockDialogs {
    /// Creates dialogs that select nothing and decline everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selection: Vec::new(),
            confirm: false,
            save_path: None,
            select_prompts: Arc::new(Mutex::new(Vec::new())),
            confirms: Arc::new(Mutex::new(0)),
            save_prompts: Arc::new(Mutex::new(0)),
        }
    }

    /// Makes the file picker return `paths`.
    #[must_use]
    pub fn with_selection(mut self, paths: Vec<PathBuf>) -> Self {
        self.selection = paths;
        self
    }

    /// Sets the answer to the save question and the chosen save path.
    #[must_use]
    pub fn answering(mut self, confirm: bool, save_path: Option<PathBuf>) -> Self {
        self.confirm = confirm;
        self.save_path = save_path;
        self
    }

    /// Prompts shown by the file picker.
    #[must_use]
    pub fn select_prompts(&self) -> Vec<String> {
        lock(&self.select_prompts).clone()
    }

    /// Number of yes/no questions asked.
    #[must_use]
    pub fn confirm_count(&self) -> usize {
        *lock(&self.confirms)
    }

    /// Number of save location dialogs shown.
    #[must_use]
    pub fn save_prompt_count(&self) -> usize {
        *lock(&self.save_prompts)
    }
}

impl Default for MockDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialogs for MockDialogs {
    fn select_files(&self, request: &FileSelectRequest) -> Vec<PathBuf> {
        lock(&self.select_prompts).push(request.prompt.clone());
        self.selection.clone()
    }

    fn confirm(&self, _title: &str, _message: &str) -> bool {
        *lock(&self.confirms) += 1;
        self.confirm
    }

    fn choose_save_path(&self, _title: &str, _start_dir: &Path) -> Option<PathBuf> {
        *lock(&self.save_prompts) += 1;
        self.save_path.clone()
    }
}

// === Codec ===

/// Mock implementation of `ImageCodec`.
///
/// Decodes every path into an 8x8 gray image unless the path was marked as
/// failing. Encodes are recorded, including failed ones.
pub struct MockCodec {
    failing: HashSet<PathBuf>,
    fail_encode: bool,
    decoded: Arc<Mutex<Vec<PathBuf>>>,
    encoded: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockCodec {
    /// Creates a codec that decodes and encodes everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            fail_encode: false,
            decoded: Arc::new(Mutex::new(Vec::new())),
            encoded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes decoding `path` fail.
    #[must_use]
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Makes every encode fail.
    #[must_use]
    pub fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    /// Paths passed to `decode`, in order.
    #[must_use]
    pub fn decoded(&self) -> Vec<PathBuf> {
        lock(&self.decoded).clone()
    }

    /// Paths passed to `encode`, in order.
    #[must_use]
    pub fn encoded(&self) -> Vec<PathBuf> {
        lock(&self.encoded).clone()
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCodec for MockCodec {
    fn decode(&self, path: &Path) -> anyhow::Result<Image> {
        lock(&self.decoded).push(path.to_path_buf());
        if self.failing.contains(path) {
            bail!("cannot decode {}", path.display());
        }
        Ok(SyntheticImageBuilder::labelled(
            &path.display().to_string(),
            8,
            8,
        ))
    }

    fn encode(&self, image: &Image, path: &Path) -> anyhow::Result<()> {
        lock(&self.encoded).push(path.to_path_buf());
        if !image.is_valid() {
            bail!("cannot encode an invalid image");
        }
        if self.fail_encode {
            bail!("no space left on device");
        }
        Ok(())
    }
}

// === Stitcher ===

/// Mock implementation of `Stitcher` returning a fixed outcome.
pub struct MockStitcher {
    outcome: StitchOutcome,
    inputs: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockStitcher {
    /// Creates a stitcher that always returns `outcome`.
    #[must_use]
    pub fn new(outcome: StitchOutcome) -> Self {
        Self {
            outcome,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a stitcher that succeeds with a 64x16 panorama.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::new(StitchOutcome::Success(SyntheticImageBuilder::labelled(
            "panorama", 64, 16,
        )))
    }

    /// Number of `stitch` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.inputs).len()
    }

    /// Image sources passed to each call.
    #[must_use]
    pub fn inputs(&self) -> Vec<Vec<String>> {
        lock(&self.inputs).clone()
    }
}

impl Stitcher for MockStitcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn stitch(&self, images: &ImageSet) -> StitchOutcome {
        lock(&self.inputs).push(images.iter().map(|i| i.source.clone()).collect());
        self.outcome.clone()
    }
}

// === Notifier ===

/// Mock implementation of `Notifier`. Captures notifications for assertions.
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(String, String, Severity)>>>,
}

impl MockNotifier {
    /// Creates a new mock notifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All notifications as `(title, message, severity)`.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, String, Severity)> {
        lock(&self.sent).clone()
    }

    /// Messages sent with `Severity::Info`.
    #[must_use]
    pub fn infos(&self) -> Vec<String> {
        self.messages(Severity::Info)
    }

    /// Messages sent with `Severity::Error`.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.messages(Severity::Error)
    }

    fn messages(&self, severity: Severity) -> Vec<String> {
        lock(&self.sent)
            .iter()
            .filter(|(_, _, s)| *s == severity)
            .map(|(_, m, _)| m.clone())
            .collect()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) -> anyhow::Result<()> {
        lock(&self.sent).push((title.to_string(), message.to_string(), severity));
        Ok(())
    }
}

// === Progress ===

/// Mock implementation of `ProgressSink`. Captures events for assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        lock(&self.events).clone()
    }

    /// Returns the number of `Acquired` events.
    #[must_use]
    pub fn acquired_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Acquired { .. }))
            .count()
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Failed { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { acquired, failed } => Some((*acquired, *failed)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        lock(&self.events).push(event);
    }
}
