//! Progress reporting port for UI integration.

/// Events emitted while a frame source collects images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Acquisition started.
    Started {
        /// Source kind (`camera`, `video`, `images`, ...).
        source: String,
        /// Expected number of images, if known.
        total: Option<usize>,
    },
    /// An image was added to the set.
    Acquired {
        /// Position in the set (0-based).
        index: usize,
        /// Where the image came from.
        label: String,
    },
    /// An image could not be decoded; a placeholder was added.
    Failed {
        /// Position in the set (0-based).
        index: usize,
        /// Where the image came from.
        label: String,
        /// Why it failed.
        reason: String,
    },
    /// Acquisition finished.
    Finished {
        /// Images added successfully.
        acquired: usize,
        /// Placeholders added for failures.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// A sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
