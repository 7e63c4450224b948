//! CLI definition and handlers.

pub mod demos;
pub mod run;

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};
use pano_core::{DemoCatalog, SourceSelection};

/// Hint printed when no source flag is given.
pub const USAGE_HINT: &str = "Use -h or --help for more information";

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Panorama built, help shown, or nothing to do.
    Success = 0,
    /// The run ended without a panorama.
    Failed = 1,
    /// Bad arguments or configuration.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Parse and validate a video sampling fraction, in (0, 1).
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not in (0, 1)"))
    }
}

/// Parse a demo reference: a numeric id, or a dataset name.
///
/// Numeric ids are range-checked when the run starts.
fn parse_demo(s: &str) -> Result<usize, String> {
    if let Ok(id) = s.parse::<usize>() {
        return Ok(id);
    }
    DemoCatalog::builtin()
        .position(&s.to_lowercase())
        .ok_or_else(|| format!("unknown demo '{s}' (see --list-demos)"))
}

/// Panorama Stitcher - build panoramas from a camera, a video, images or demo datasets
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "pano")]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
#[command(group(
    ArgGroup::new("source")
        .args(["camera", "select", "images", "video", "demo", "help", "list_demos"])
        .multiple(false)
))]
pub struct Cli {
    /// Capture frames from the camera (RETURN captures, ESC finishes)
    #[arg(short, long)]
    pub camera: bool,

    /// Choose images in a file dialog
    #[arg(short, long)]
    pub select: bool,

    /// Comma-separated image paths, in left-to-right order
    #[arg(short, long, value_delimiter = ',', value_name = "PATHS")]
    pub images: Vec<PathBuf>,

    /// Sample frames from a video file
    #[arg(short, long, value_name = "PATH")]
    pub video: Option<PathBuf>,

    /// Stitch a demo dataset, by id or name
    #[arg(short, long, value_name = "ID|NAME", value_parser = parse_demo)]
    pub demo: Option<usize>,

    /// Print help
    #[arg(short, long)]
    pub help: bool,

    /// List the demo datasets and exit
    #[arg(long)]
    pub list_demos: bool,

    /// Video sampling fraction, in (0, 1)
    #[arg(long, value_parser = parse_fraction)]
    pub fraction: Option<f64>,

    /// Directory holding the demo datasets
    #[arg(long, value_name = "DIR")]
    pub demo_root: Option<PathBuf>,

    /// Camera device index
    #[arg(long, value_name = "N")]
    pub camera_device: Option<u32>,

    /// Only print notifications, never send desktop notifications
    /// (desktop notifications need a build with the `desktop` feature)
    #[arg(long)]
    pub no_notify: bool,

    /// Increase verbosity (--verbose, --verbose --verbose, ...)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and logs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The frame source the flags ask for.
    #[must_use]
    pub fn selection(&self) -> SourceSelection {
        if self.help {
            SourceSelection::Help
        } else if self.camera {
            SourceSelection::Camera
        } else if self.select {
            SourceSelection::FileSelect
        } else if !self.images.is_empty() {
            SourceSelection::ImageList(self.images.clone())
        } else if let Some(video) = &self.video {
            SourceSelection::VideoFile(video.clone())
        } else if let Some(id) = self.demo {
            SourceSelection::Demo(id)
        } else {
            SourceSelection::None
        }
    }
}
