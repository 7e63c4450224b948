//! Demo dataset resolution.

use std::path::{Path, PathBuf};

use crate::domain::DemoCatalog;
use crate::error::AcquisitionError;

/// Maps demo ids to the ordered frame paths of their dataset.
///
/// Frames live at `<root>/<name>/<name>-<NN>.<ext>`.
#[derive(Debug, Clone)]
pub struct DatasetResolver {
    catalog: DemoCatalog,
    root: PathBuf,
    extension: String,
}

impl DatasetResolver {
    /// Creates a resolver over `catalog` rooted at `root`, for `extension` files.
    #[must_use]
    pub fn new(catalog: DemoCatalog, root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            catalog,
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Returns the dataset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generates the frame paths of dataset `id`, in frame order.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError::UnknownDemo`] if `id` is not in the catalog.
    pub fn resolve(&self, id: usize) -> Result<Vec<PathBuf>, AcquisitionError> {
        let dataset = self.catalog.get(id).ok_or(AcquisitionError::UnknownDemo {
            id,
            size: self.catalog.len(),
        })?;

        let dir = self.root.join(dataset.name);
        Ok((0..dataset.frame_count)
            .map(|index| dir.join(frame_file_name(dataset.name, index, &self.extension)))
            .collect())
    }
}

/// File name of frame `index` of dataset `name`.
///
/// Indices below 10 are zero-padded to two digits.
#[must_use]
pub fn frame_file_name(name: &str, index: usize, extension: &str) -> String {
    format!("{name}-{index:02}.{extension}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn resolver() -> DatasetResolver {
        DatasetResolver::new(DemoCatalog::builtin(), "./demos", "png")
    }

    #[test]
    fn test_frame_file_name_padding() {
        assert_eq!(frame_file_name("rio", 0, "png"), "rio-00.png");
        assert_eq!(frame_file_name("rio", 9, "png"), "rio-09.png");
        assert_eq!(frame_file_name("rio", 10, "png"), "rio-10.png");
        assert_eq!(frame_file_name("rio", 55, "jpg"), "rio-55.jpg");
    }

    #[test]
    fn test_resolve_hotel() {
        let catalog = DemoCatalog::builtin();
        let id = catalog.position("hotel").unwrap_or_else(|| panic!("hotel missing"));
        let paths = resolver().resolve(id).unwrap_or_else(|e| panic!("{e}"));

        let expected: Vec<PathBuf> = (0..8)
            .map(|i| PathBuf::from(format!("./demos/hotel/hotel-0{i}.png")))
            .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_resolve_crosses_two_digit_boundary() {
        let catalog = DemoCatalog::builtin();
        let id = catalog.position("fishbowl").unwrap_or_else(|| panic!("fishbowl missing"));
        let paths = resolver().resolve(id).unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(paths.len(), 13);
        assert!(paths[9].ends_with("fishbowl/fishbowl-09.png"));
        assert!(paths[12].ends_with("fishbowl/fishbowl-12.png"));
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let err = resolver().resolve(11).unwrap_err();
        assert_eq!(err, AcquisitionError::UnknownDemo { id: 11, size: 11 });
        assert!(resolver().resolve(usize::MAX).is_err());
    }
}
