//! The resolved acquisition intent.

use std::path::PathBuf;

/// Which source a run draws its images from.
///
/// Built once from the parsed command line and consumed by
/// [`Acquisition::acquire`](crate::acquisition::Acquisition::acquire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Capture frames interactively from the default camera.
    Camera,
    /// Pick image files in a file dialog.
    FileSelect,
    /// Load the given image files, in order.
    ImageList(Vec<PathBuf>),
    /// Sample frames from a video file.
    VideoFile(PathBuf),
    /// Load a built-in demo dataset by catalog id.
    Demo(usize),
    /// Print usage and stop.
    Help,
    /// No source was requested.
    None,
}

impl SourceSelection {
    /// Short name used in logs and progress output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::FileSelect => "file-select",
            Self::ImageList(_) => "images",
            Self::VideoFile(_) => "video",
            Self::Demo(_) => "demo",
            Self::Help => "help",
            Self::None => "none",
        }
    }
}
