//! Pano Core - image acquisition and panorama orchestration.
//!
//! This crate holds the domain types, the capability ports, and the control
//! flow of a run: pick one frame source, collect an ordered image set, hand
//! it to a stitching engine, then walk the user through preview and saving.
//! Native capabilities (cameras, codecs, dialogs, the engine itself) live
//! behind the traits in [`ports`].

pub mod acquisition;
pub mod domain;
pub mod error;
pub mod notification;
pub mod pipeline;
pub mod ports;
pub mod session;
pub mod settings;
pub mod workflow;

pub use acquisition::{Acquired, Acquisition};
pub use domain::{
    DemoCatalog, DemoDataset, Image, ImageSet, RunStatus, SourceSelection, StitchOutcome,
};
pub use error::{AcquisitionError, PipelineError};
pub use pipeline::PanoramaPipeline;
pub use ports::{
    CaptureDevices, Dialogs, Display, ImageCodec, Notifier, ProgressEvent, ProgressSink, Stitcher,
};
pub use session::{Services, Session};
pub use settings::Settings;
pub use workflow::ResultWorkflow;
