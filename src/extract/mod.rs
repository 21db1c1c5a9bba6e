//! Per-dataset fix extraction
//!
//! [`Extractor`] is chosen from a [`Detection`] and the folder layout:
//!
//! | Dataset | Classic layout | Nested layout |
//! |---------|----------------|---------------|
//! | Wingtra | `Wingtra` (grandparent label) | `Wingtra` (folder label) |
//! | DJI     | `DjiFilename` | `DjiExif` |

pub mod dji;
pub mod time;
pub mod wingtra;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::types::{DatasetKind, Detection, FlightFix, FolderLayout};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Wingtra(FolderLayout),
    /// Times from `DJI_YYYYMMDDHHMM` names of the MRK and last JPG
    DjiFilename,
    /// Times from EXIF `DateTimeOriginal` of the first and last JPG
    DjiExif,
}

impl Extractor {
    pub fn select(kind: DatasetKind, layout: FolderLayout) -> Self {
        match (kind, layout) {
            (DatasetKind::Wingtra, layout) => Extractor::Wingtra(layout),
            (_, FolderLayout::Classic) => Extractor::DjiFilename,
            (_, FolderLayout::Nested) => Extractor::DjiExif,
        }
    }

    pub fn extract(
        self,
        detection: &Detection,
        folder: &Path,
        config: &QueryConfig,
    ) -> Result<FlightFix> {
        let source = detection.source.as_path();
        match self {
            Extractor::Wingtra(layout) => wingtra::extract(source, folder, layout, config),
            Extractor::DjiFilename => {
                dji::extract_from_filenames(source, folder, detection.kind, config)
            }
            Extractor::DjiExif => dji::extract_from_exif(source, folder, detection.kind, config),
        }
    }
}
