//! Demo listing - print the built-in datasets and where they are read from.

use std::io::Write;

use anyhow::Result;
use pano_core::{DemoCatalog, Settings};

/// Writes one row per dataset: id, name, frame count and directory.
pub fn list(catalog: &DemoCatalog, settings: &Settings, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{:>2}  {:<12} {:>6}  PATH", "ID", "NAME", "FRAMES")?;
    for (id, dataset) in catalog.iter() {
        writeln!(
            out,
            "{id:>2}  {:<12} {:>6}  {}",
            dataset.name,
            dataset.frame_count,
            settings.demo_root.join(dataset.name).display()
        )?;
    }
    Ok(())
}
