//! One flight folder in, one SAPOS query line out

use crate::config::QueryConfig;
use crate::detect::detect_dataset;
use crate::error::Result;
use crate::extract::Extractor;
use crate::format::{format_line, write_query_file, LineStyle};
use crate::types::{DatasetKind, FolderLayout};
use crate::window::QueryWindow;
use log::debug;
use std::path::{Path, PathBuf};

/// Outcome of a successful folder run
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLine {
    pub kind: DatasetKind,
    pub text: String,
    /// The `@sapos_query.txt` that was written
    pub path: PathBuf,
}

/// Derive the query line without touching the filesystem beyond reads
pub fn build_query_line(
    folder: &Path,
    layout: FolderLayout,
    config: &QueryConfig,
) -> Result<(DatasetKind, String)> {
    let detection = detect_dataset(folder)?;
    let extractor = Extractor::select(detection.kind, layout);
    debug!("{}: {} via {:?}", folder.display(), detection.kind, extractor);

    let flight = extractor.extract(&detection, folder, config)?;
    let window = QueryWindow::for_flight(&flight, config);
    Ok((detection.kind, format_line(&flight, &window, config)))
}

/// Detect, extract, format and write `@sapos_query.txt` into `folder`
///
/// Nothing is written unless the whole line could be derived.
pub fn generate_sapos_query(
    folder: &Path,
    layout: FolderLayout,
    config: &QueryConfig,
) -> Result<QueryLine> {
    let (kind, text) = build_query_line(folder, layout, config)?;
    let path = write_query_file(folder, &text, LineStyle::for_kind(kind), config)?;
    Ok(QueryLine { kind, text, path })
}
