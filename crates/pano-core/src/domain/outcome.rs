//! Stitching results and run statuses.

use std::fmt;
use std::path::PathBuf;

use super::Image;

/// What the stitching engine reports for one attempt.
#[derive(Debug, Clone)]
pub enum StitchOutcome {
    /// The engine produced a composite.
    Success(Image),
    /// The images do not overlap enough to be registered.
    InsufficientOverlap,
    /// Any other engine failure.
    Failed(String),
}

impl StitchOutcome {
    /// Returns `true` for [`StitchOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl fmt::Display for StitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(image) => write!(f, "success ({}x{})", image.width, image.height),
            Self::InsufficientOverlap => f.write_str("insufficient overlap between images"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Help or no source: nothing was attempted.
    Exit,
    /// A panorama was created and saved.
    Saved(PathBuf),
    /// A panorama was created but not saved.
    Completed,
    /// The run reported an error to the user.
    Failed(String),
}
