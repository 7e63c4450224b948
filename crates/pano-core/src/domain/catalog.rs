//! Built-in demo datasets.

/// A named demo dataset and the number of frames it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDataset {
    /// Dataset name, also its directory and file prefix.
    pub name: &'static str,
    /// Number of frames, numbered from 0.
    pub frame_count: usize,
}

const BUILTIN: &[DemoDataset] = &[
    DemoDataset { name: "carmel", frame_count: 18 },
    DemoDataset { name: "diamondhead", frame_count: 23 },
    DemoDataset { name: "example", frame_count: 2 },
    DemoDataset { name: "fishbowl", frame_count: 13 },
    DemoDataset { name: "goldengate", frame_count: 6 },
    DemoDataset { name: "halfdome", frame_count: 14 },
    DemoDataset { name: "hotel", frame_count: 8 },
    DemoDataset { name: "office", frame_count: 4 },
    DemoDataset { name: "rio", frame_count: 56 },
    DemoDataset { name: "shanghai", frame_count: 30 },
    DemoDataset { name: "yard", frame_count: 9 },
];

/// Ordered table of demo datasets, indexed by small integer ids.
#[derive(Debug, Clone, Copy)]
pub struct DemoCatalog {
    entries: &'static [DemoDataset],
}

impl DemoCatalog {
    /// The catalog shipped with the tool.
    #[must_use]
    pub const fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// A catalog over custom entries.
    #[must_use]
    pub const fn from_static(entries: &'static [DemoDataset]) -> Self {
        Self { entries }
    }

    /// Number of datasets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no datasets.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the dataset with the given id.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&DemoDataset> {
        self.entries.get(id)
    }

    /// Returns the id of the dataset with the given name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|d| d.name == name)
    }

    /// Iterates `(id, dataset)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DemoDataset)> {
        self.entries.iter().enumerate()
    }
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
