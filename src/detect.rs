//! Dataset detection
//!
//! Marker files decide the dataset family, in priority order:
//! any `.json` below the folder means Wingtra, otherwise any `.mrk` means
//! DJI, and an `.ldr` directly inside the folder narrows DJI to Zenmuse L2.

use crate::error::{Result, SaposError};
use crate::scan::{files_in_dir, first_recursive};
use crate::types::{DatasetKind, Detection};
use log::debug;
use std::path::Path;

pub fn detect_dataset(folder: &Path) -> Result<Detection> {
    if !folder.is_dir() {
        return Err(SaposError::NotADirectory(folder.to_path_buf()));
    }

    if let Some(json) = first_recursive(folder, "json")? {
        debug!("{}: Wingtra telemetry {}", folder.display(), json.display());
        return Ok(Detection {
            kind: DatasetKind::Wingtra,
            source: json,
        });
    }

    if let Some(mrk) = first_recursive(folder, "mrk")? {
        let kind = if files_in_dir(folder, "ldr")?.is_empty() {
            DatasetKind::DjiMrk
        } else {
            DatasetKind::ZenmuseL2
        };
        debug!("{}: {} position log {}", folder.display(), kind, mrk.display());
        return Ok(Detection { kind, source: mrk });
    }

    Err(SaposError::NoDatasetDetected(folder.to_path_buf()))
}
