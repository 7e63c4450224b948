//! Test support utilities for pano.
//!
//! Provides scripted and recording fakes of every port in
//! `pano_core::ports`, plus synthetic image builders, so acquisition and the
//! result workflow can be exercised without cameras, windows or dialogs.
//!
//! # Example
//!
//! ```
//! use pano_core::ports::Key;
//! use pano_test_support::{MockDevices, MockDisplay, SyntheticImageBuilder};
//!
//! let frames = vec![
//!     SyntheticImageBuilder::labelled("camera:0#0", 32, 24),
//!     SyntheticImageBuilder::labelled("camera:0#1", 32, 24),
//! ];
//! let devices = MockDevices::with_camera(frames);
//! let display = MockDisplay::with_keys(vec![Some(Key::Return), Some(Key::Escape)]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    DeviceLog, DisplayLog, MockCodec, MockDevices, MockDialogs, MockDisplay, MockNotifier,
    MockProgressSink, MockStitcher,
};
