use std::fmt;
use std::path::PathBuf;

/// Flight dataset families recognised by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Wingtra JSON telemetry
    Wingtra,
    /// DJI Zenmuse L2: MRK log with an LDR lidar file next to it
    ZenmuseL2,
    /// Other MRK-writing DJI models (Mavic 3 Enterprise, Phantom 3 Multispectral)
    DjiMrk,
}

impl DatasetKind {
    pub fn is_dji(self) -> bool {
        matches!(self, DatasetKind::ZenmuseL2 | DatasetKind::DjiMrk)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Wingtra => "Wingtra",
            DatasetKind::ZenmuseL2 => "DJI Zenmuse L2",
            DatasetKind::DjiMrk => "DJI MRK (Mavic 3 Enterprise / Phantom 3 Multispectral)",
        };
        f.write_str(name)
    }
}

/// How flight folders are arranged on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderLayout {
    /// One folder per flight; DJI times come from file names
    #[default]
    Classic,
    /// `date/flight` folders; DJI times come from EXIF, labels from folder names
    Nested,
}

/// Result of classifying a flight folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: DatasetKind,
    /// The JSON (Wingtra) or MRK (DJI) file the extractor reads
    pub source: PathBuf,
}
