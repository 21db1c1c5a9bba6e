//! SAPOS Query Library
//!
//! Detects drone survey datasets (Wingtra, DJI Zenmuse L2, DJI Mavic 3
//! Enterprise / Phantom 3 Multispectral) inside flight folders and derives the
//! one-line SAPOS query record used to order PPK correction data.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `sapos-query` command-line binary
//!
//! # Quick Start
//!
//! Write `@sapos_query.txt` for one flight folder:
//! ```rust,no_run
//! use sapos_query::{generate_sapos_query, FolderLayout, QueryConfig};
//! use std::path::Path;
//!
//! let config = QueryConfig::default();
//! let line = generate_sapos_query(Path::new("flights/Forst12"), FolderLayout::Classic, &config).unwrap();
//! println!("{} -> {}", line.kind, line.text);
//! ```
//!
//! Collect every flight under a `date/flight` tree into one master file:
//! ```rust,no_run
//! use sapos_query::{batch_generate_sapos_queries, BatchOptions, FolderLayout, QueryConfig};
//! use std::path::Path;
//!
//! let options = BatchOptions { layout: FolderLayout::Nested, recurse: false };
//! let report = batch_generate_sapos_queries(
//!     Path::new("survey_2024"),
//!     Path::new("out"),
//!     &options,
//!     &QueryConfig::default(),
//! )
//! .unwrap();
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.folder.display(), skipped.reason);
//! }
//! ```
//!
//! # Public API
//!
//! ## Query Building
//! - [`detect_dataset`] - Classify a flight folder by its marker files
//! - [`Extractor`] - Wingtra / DJI file-name / DJI EXIF fix extraction
//! - [`QueryWindow`] - Buffered start and duration per dataset family
//! - [`format_line`] - Render the decimal-point or decimal-comma line
//! - [`generate_sapos_query`] - All of the above plus writing the query file
//!
//! ## Batch
//! - [`batch_generate_sapos_queries`] - Process many folders, continue on failure
//! - [`collect_flight_folders`] - Folder selection for classic and nested trees

// Module declarations
pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod format;
pub mod query;
pub mod scan;
pub mod types;
pub mod window;

pub use batch::*;
pub use config::*;
pub use detect::*;
pub use error::*;
pub use extract::Extractor;
pub use format::*;
pub use query::*;
pub use types::*;
pub use window::*;
