//! Frame source behaviour, driven through scripted devices and windows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use image::Rgb;
use pano_core::acquisition::{
    Acquired, Acquisition, LiveCapture, StaticUpload, VideoSampler, CAPTURE_HINT, SELECT_PROMPT,
};
use pano_core::ports::{Key, NoProgress};
use pano_core::{AcquisitionError, DemoCatalog, ImageSet, Services, Settings, SourceSelection};
use pano_test_support::{
    MockCodec, MockDevices, MockDialogs, MockDisplay, MockNotifier, MockProgressSink,
    MockStitcher, SyntheticImageBuilder,
};

fn camera_frames(count: usize) -> Vec<pano_core::Image> {
    (0..count)
        .map(|i| SyntheticImageBuilder::labelled(&format!("camera:0#{i}"), 64, 48))
        .collect()
}

fn sources(images: &ImageSet) -> Vec<String> {
    images.iter().map(|i| i.source.clone()).collect()
}

/// Bundles one set of mocks so a test can build `Services` from them.
struct Rig {
    devices: MockDevices,
    codec: MockCodec,
    display: MockDisplay,
    dialogs: MockDialogs,
    notifier: MockNotifier,
    stitcher: MockStitcher,
    progress: MockProgressSink,
}

impl Rig {
    fn new() -> Self {
        Self {
            devices: MockDevices::new(),
            codec: MockCodec::new(),
            display: MockDisplay::default(),
            dialogs: MockDialogs::new(),
            notifier: MockNotifier::new(),
            stitcher: MockStitcher::succeeding(),
            progress: MockProgressSink::new(),
        }
    }

    fn services(&self) -> Services<'_> {
        Services {
            devices: &self.devices,
            codec: &self.codec,
            display: &self.display,
            dialogs: &self.dialogs,
            notifier: &self.notifier,
            stitcher: &self.stitcher,
            progress: &self.progress,
        }
    }

    fn acquire(
        &self,
        settings: &Settings,
        selection: SourceSelection,
    ) -> Result<Acquired, AcquisitionError> {
        Acquisition::new(self.services(), DemoCatalog::builtin(), settings).acquire(selection)
    }
}

fn images(acquired: Acquired) -> ImageSet {
    match acquired {
        Acquired::Images(images) => images,
        Acquired::Exit => panic!("expected images, got exit"),
    }
}

// === Live capture ===

#[test]
fn test_live_capture_keeps_frames_on_return() {
    let devices = MockDevices::with_camera(camera_frames(4));
    let display = MockDisplay::with_keys(vec![
        None,
        Some(Key::Return),
        Some(Key::Return),
        Some(Key::Escape),
    ]);
    let progress = MockProgressSink::new();

    let captured = LiveCapture::new(&devices, &display, &progress, 0).run();

    // The originals are kept; the hint only appears in the preview.
    assert_eq!(sources(&captured), vec!["camera:0#1", "camera:0#2"]);
    assert_eq!(progress.acquired_count(), 2);
    assert_eq!(progress.finished_counts(), Some((2, 0)));

    let device_log = devices.log();
    assert_eq!(device_log.camera_opens, 1);
    assert_eq!(device_log.released, 1);

    let display_log = display.log();
    assert_eq!(display_log.previews_opened, 1);
    assert_eq!(display_log.previews_closed, 1);
    assert_eq!(display_log.presented.len(), 4);
    assert!(display_log.presented.iter().all(|s| s.ends_with("+text+text")));
}

#[test]
fn test_live_capture_keeps_only_frames_shown_when_return_arrived() {
    let devices = MockDevices::with_camera(camera_frames(6));
    let display = MockDisplay::with_keys(vec![
        None,
        Some(Key::Return),
        None,
        None,
        Some(Key::Return),
        Some(Key::Escape),
    ]);

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 0).run();

    assert_eq!(sources(&captured), vec!["camera:0#1", "camera:0#4"]);
    assert_eq!(devices.log().camera_reads, 6);
}

#[test]
fn test_live_capture_draws_outline_then_fill() {
    let devices = MockDevices::with_camera(camera_frames(1));
    let display = MockDisplay::with_keys(vec![Some(Key::Escape)]);

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 0).run();
    assert!(captured.is_empty());

    let overlays = display.log().overlays;
    assert_eq!(
        overlays,
        vec![
            (CAPTURE_HINT.to_string(), Rgb([0, 0, 0]), 3),
            (CAPTURE_HINT.to_string(), Rgb([255, 255, 255]), 1),
        ]
    );
}

#[test]
fn test_live_capture_ignores_other_keys() {
    let devices = MockDevices::with_camera(camera_frames(3));
    let display = MockDisplay::with_keys(vec![
        Some(Key::Other(i32::from(b'a'))),
        Some(Key::Other(i32::from(b' '))),
        Some(Key::Escape),
    ]);

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 0).run();
    assert!(captured.is_empty());
    assert_eq!(devices.log().released, 1);
}

#[test]
fn test_live_capture_ends_with_stream() {
    let devices = MockDevices::with_camera(camera_frames(2));
    let display = MockDisplay::with_keys(vec![Some(Key::Return)]);

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 0).run();

    assert_eq!(sources(&captured), vec!["camera:0#0"]);
    let log = devices.log();
    assert_eq!(log.camera_reads, 3);
    assert_eq!(log.released, 1);
    assert_eq!(display.log().previews_closed, 1);
}

#[test]
fn test_live_capture_without_camera() {
    let devices = MockDevices::new();
    let display = MockDisplay::default();

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 3).run();

    assert!(captured.is_empty());
    assert_eq!(display.log().previews_opened, 0);
}

#[test]
fn test_live_capture_without_window_releases_camera() {
    let devices = MockDevices::with_camera(camera_frames(2));
    let display = MockDisplay::headless();

    let captured = LiveCapture::new(&devices, &display, &NoProgress, 0).run();

    assert!(captured.is_empty());
    let log = devices.log();
    assert_eq!(log.camera_reads, 0);
    assert_eq!(log.released, 1);
}

// === Video sampling ===

#[test]
fn test_video_sampling_hundred_frames() {
    let devices = MockDevices::with_video(100);
    let progress = MockProgressSink::new();
    let sampler = VideoSampler::new(0.1).unwrap();

    let sampled = sampler.sample(&devices, Path::new("clip.gif"), &progress);

    let expected: Vec<usize> = (0..100).step_by(10).collect();
    assert_eq!(sampled.len(), 10);
    let log = devices.log();
    assert_eq!(log.seeks, expected);
    assert_eq!(log.reads, expected);
    assert_eq!(log.released, 1);
    assert_eq!(progress.finished_counts(), Some((10, 0)));
}

#[test]
fn test_video_sampling_short_video_reads_every_frame() {
    let devices = MockDevices::with_video(5);
    let sampler = VideoSampler::new(0.1).unwrap();

    let sampled = sampler.sample(&devices, Path::new("short.gif"), &NoProgress);

    assert_eq!(sampled.len(), 5);
    assert_eq!(devices.log().reads, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_video_sampling_stops_at_unreadable_frame() {
    let devices = MockDevices::with_truncated_video(100, 35);
    let sampler = VideoSampler::new(0.1).unwrap();

    let sampled = sampler.sample(&devices, Path::new("broken.gif"), &NoProgress);

    assert_eq!(sampled.len(), 4);
    assert_eq!(devices.log().reads, vec![0, 10, 20, 30, 40]);
}

#[test]
fn test_video_sampling_empty_video() {
    let devices = MockDevices::with_video(0);
    let sampler = VideoSampler::new(0.5).unwrap();

    let sampled = sampler.sample(&devices, Path::new("empty.gif"), &NoProgress);

    assert!(sampled.is_empty());
    assert_eq!(devices.log().reads, vec![0]);
}

#[test]
fn test_video_without_frame_count_is_read_to_the_end() {
    let devices = MockDevices::with_truncated_video(0, 5);
    let sampler = VideoSampler::new(0.5).unwrap();

    let sampled = sampler.sample(&devices, Path::new("stream.mp4"), &NoProgress);

    assert_eq!(
        sources(&sampled),
        vec!["video@0", "video@1", "video@2", "video@3", "video@4"]
    );
    let log = devices.log();
    assert!(log.seeks.is_empty());
    assert_eq!(log.reads, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(log.released, 1);
}

#[test]
fn test_video_that_cannot_be_opened_yields_nothing() {
    let devices = MockDevices::new();
    let sampler = VideoSampler::new(0.1).unwrap();

    let sampled = sampler.sample(&devices, Path::new("missing.mp4"), &NoProgress);

    assert!(sampled.is_empty());
    assert_eq!(devices.log().video_opens, 1);
}

#[test]
fn test_invalid_fraction_opens_no_device() {
    for fraction in [0.0, 1.0] {
        let mut rig = Rig::new();
        rig.devices = MockDevices::with_video(100);
        let settings = Settings {
            sample_fraction: fraction,
            ..Settings::default()
        };

        let selection = SourceSelection::VideoFile(PathBuf::from("clip.gif"));
        let result = rig.acquire(&settings, selection);

        assert_eq!(result.unwrap_err(), AcquisitionError::InvalidFraction(fraction));
        assert_eq!(rig.devices.log().video_opens, 0);
    }
}

// === Static upload ===

#[test]
fn test_upload_keeps_failed_files_in_place() {
    let codec = MockCodec::new().failing_on("b.png");
    let progress = MockProgressSink::new();
    let paths: Vec<PathBuf> = ["a.png", "b.png", "c.png"].iter().map(PathBuf::from).collect();

    let uploaded = StaticUpload::new(&codec, &progress).load(&paths);

    assert_eq!(uploaded.len(), 3);
    assert!(uploaded.get(0).unwrap().is_valid());
    assert!(!uploaded.get(1).unwrap().is_valid());
    assert!(uploaded.get(2).unwrap().is_valid());
    assert_eq!(uploaded.get(1).unwrap().source, "b.png");
    assert_eq!(codec.decoded(), paths);
    assert_eq!(progress.failed_count(), 1);
    assert_eq!(progress.finished_counts(), Some((2, 1)));
}

#[test]
fn test_upload_of_nothing() {
    let codec = MockCodec::new();
    let uploaded = StaticUpload::new(&codec, &NoProgress).load(&[]);
    assert!(uploaded.is_empty());
}

// === Dispatch ===

#[test]
fn test_help_and_none_exit_without_touching_devices() {
    let rig = Rig::new();
    let settings = Settings::default();

    for selection in [SourceSelection::Help, SourceSelection::None] {
        assert!(matches!(rig.acquire(&settings, selection), Ok(Acquired::Exit)));
    }

    let log = rig.devices.log();
    assert_eq!(log.camera_opens + log.video_opens, 0);
    assert!(rig.codec.decoded().is_empty());
    assert_eq!(rig.dialogs.select_prompts().len(), 0);
}

#[test]
fn test_file_select_uses_dialog_choice() {
    let mut rig = Rig::new();
    rig.dialogs = MockDialogs::new().with_selection(vec![
        PathBuf::from("left.jpg"),
        PathBuf::from("right.jpg"),
    ]);

    let acquired = rig
        .acquire(&Settings::default(), SourceSelection::FileSelect)
        .unwrap();

    assert_eq!(sources(&images(acquired)), vec!["left.jpg", "right.jpg"]);
    assert_eq!(rig.dialogs.select_prompts(), vec![SELECT_PROMPT.to_string()]);
}

#[test]
fn test_file_select_cancelled_gives_empty_set() {
    let rig = Rig::new();
    let acquired = rig
        .acquire(&Settings::default(), SourceSelection::FileSelect)
        .unwrap();
    assert!(images(acquired).is_empty());
}

#[test]
fn test_demo_resolves_catalog_paths() {
    let rig = Rig::new();
    let settings = Settings {
        demo_root: PathBuf::from("/data/demos"),
        ..Settings::default()
    };

    let acquired = rig.acquire(&settings, SourceSelection::Demo(7)).unwrap();

    let office = images(acquired);
    assert_eq!(office.len(), 4);
    assert_eq!(
        rig.codec.decoded(),
        (0..4)
            .map(|i| PathBuf::from(format!("/data/demos/office/office-0{i}.png")))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_demo_out_of_range_reads_nothing() {
    let rig = Rig::new();

    let result = rig.acquire(&Settings::default(), SourceSelection::Demo(11));

    assert_eq!(
        result.unwrap_err(),
        AcquisitionError::UnknownDemo { id: 11, size: 11 }
    );
    assert!(rig.codec.decoded().is_empty());
}
