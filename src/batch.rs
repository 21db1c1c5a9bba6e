//! Batch collection over many flight folders
//!
//! Every folder is processed on its own; a failure is recorded and the run
//! moves on. Successful lines are gathered into one master file.

use crate::config::QueryConfig;
use crate::error::Result;
use crate::query::{generate_sapos_query, QueryLine};
use crate::scan::subdirectories;
use crate::types::FolderLayout;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub layout: FolderLayout,
    /// Classic layout only: consider every descendant folder
    pub recurse: bool,
}

/// A folder that produced no line, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFolder {
    pub folder: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub master_path: PathBuf,
    pub written: Vec<QueryLine>,
    pub skipped: Vec<SkippedFolder>,
}

/// Flight folders below `root` for the given layout, sorted by path
pub fn collect_flight_folders(root: &Path, options: &BatchOptions) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    match (options.layout, options.recurse) {
        (FolderLayout::Classic, false) => folders = subdirectories(root)?,
        (FolderLayout::Classic, true) => descendants(root, &mut folders)?,
        (FolderLayout::Nested, _) => {
            for date_folder in subdirectories(root)? {
                folders.extend(subdirectories(&date_folder)?);
            }
        }
    }
    folders.sort();
    Ok(folders)
}

fn descendants(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for sub in subdirectories(dir)? {
        out.push(sub.clone());
        if !sub.is_symlink() {
            descendants(&sub, out)?;
        }
    }
    Ok(())
}

/// Where the master file goes: directories and extension-less targets get the default name
pub fn resolve_master_path(target: &Path, layout: FolderLayout, config: &QueryConfig) -> PathBuf {
    if target.is_dir() || target.extension().is_none() {
        let name = match layout {
            FolderLayout::Classic => &config.master_file_name,
            FolderLayout::Nested => &config.nested_master_file_name,
        };
        target.join(name)
    } else {
        target.to_path_buf()
    }
}

/// Run the query builder on every flight folder under `root`
pub fn batch_generate_sapos_queries(
    root: &Path,
    master_target: &Path,
    options: &BatchOptions,
    config: &QueryConfig,
) -> Result<BatchReport> {
    batch_generate_for_roots(&[root], master_target, options, config)
}

/// Same as [`batch_generate_sapos_queries`] over several roots, sharing one master file
pub fn batch_generate_for_roots<P: AsRef<Path>>(
    roots: &[P],
    master_target: &Path,
    options: &BatchOptions,
    config: &QueryConfig,
) -> Result<BatchReport> {
    let master_path = resolve_master_path(master_target, options.layout, config);
    if let Some(parent) = master_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut master = BufWriter::new(File::create(&master_path)?);

    let mut report = BatchReport {
        master_path,
        written: Vec::new(),
        skipped: Vec::new(),
    };

    for root in roots {
        let root = root.as_ref();
        for folder in collect_flight_folders(root, options)? {
            let label = folder.strip_prefix(root).unwrap_or(&folder).display().to_string();
            match generate_sapos_query(&folder, options.layout, config) {
                Ok(line) => {
                    writeln!(master, "{}", line.text)?;
                    info!("{}: {}", label, line.text);
                    report.written.push(line);
                }
                Err(e) => {
                    warn!("skipping {}: {}", label, e);
                    report.skipped.push(SkippedFolder {
                        folder,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
    master.flush()?;

    info!(
        "{} query line(s) saved to {}",
        report.written.len(),
        report.master_path.display()
    );
    Ok(report)
}
