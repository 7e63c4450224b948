//! Core domain types for panorama acquisition.

mod catalog;
mod image_set;
mod outcome;
mod selection;

pub use catalog::{DemoCatalog, DemoDataset};
pub use image_set::{Image, ImageSet};
pub use outcome::{RunStatus, StitchOutcome};
pub use selection::SourceSelection;
