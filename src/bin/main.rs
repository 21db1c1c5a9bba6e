//! CLI binary for SAPOS query generation
//!
//! Single mode writes `@sapos_query.txt` into each given flight folder.
//! Batch mode treats the paths as survey roots and also writes a master file.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use glob::glob;
use sapos_query::{
    batch_generate_for_roots, generate_sapos_query, BatchOptions, FolderLayout, QueryConfig,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        match (
            option_env!("VERGEN_GIT_SHA"),
            option_env!("VERGEN_GIT_COMMIT_DATE"),
        ) {
            (Some(sha), Some(date)) => format!("{} ({} {})", env!("CARGO_PKG_VERSION"), sha, date),
            (Some(sha), None) => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
            _ => env!("CARGO_PKG_VERSION").to_string(),
        }
    })
}

fn build_command() -> Command {
    Command::new("SAPOS Query")
        .version(version())
        .about("Detect Wingtra/DJI flight datasets and write SAPOS query lines (@sapos_query.txt).")
        .arg(
            Arg::new("paths")
                .help("Flight folders (or survey roots with --batch). Supports globbing.")
                .required(false)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .help("Treat paths as roots: process every flight folder below and write a master file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("nested")
                .long("nested")
                .help("Nested date/flight layout: DJI times from EXIF, flight name from the folder")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .help("With --batch in classic layout: consider every descendant folder")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .help("Master file or directory for --batch (default: current directory)")
                .value_name("PATH"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file overriding buffers, leap seconds, receiver type, time zone")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn expand_paths(patterns: &[&String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            let matched = glob(pattern)
                .with_context(|| format!("Invalid glob pattern '{}'", pattern))?
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("Error expanding glob pattern '{}'", pattern))?;
            paths.extend(matched.into_iter().filter(|p| p.is_dir()));
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }
    Ok(paths)
}

fn run_single(paths: &[PathBuf], layout: FolderLayout, config: &QueryConfig) -> usize {
    let mut processed = 0;
    for path in paths {
        match generate_sapos_query(path, layout, config) {
            Ok(line) => {
                println!("{} [{}]", path.display(), line.kind);
                println!("  {}", line.text);
                processed += 1;
            }
            Err(e) => {
                eprintln!("Skipping {}: {}", path.display(), e);
            }
        }
    }
    processed
}

fn run_batch(
    roots: &[PathBuf],
    matches: &ArgMatches,
    options: &BatchOptions,
    config: &QueryConfig,
) -> Result<usize> {
    let master = matches
        .get_one::<String>("master")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let report = batch_generate_for_roots(roots, &master, options, config)
        .context("Batch run failed")?;

    let relative = |path: &Path| -> PathBuf {
        roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
            .to_path_buf()
    };
    for line in &report.written {
        let folder = line.path.parent().unwrap_or(Path::new(""));
        println!("OK   {}", relative(folder).display());
    }
    for skipped in &report.skipped {
        println!("SKIP {}: {}", relative(&skipped.folder).display(), skipped.reason);
    }
    println!(
        "{} query line(s) saved to {}",
        report.written.len(),
        report.master_path.display()
    );
    Ok(report.written.len())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));

    let patterns: Vec<&String> = match matches.get_many::<String>("paths") {
        Some(paths) => paths.collect(),
        None => {
            build_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let config = match matches.get_one::<String>("config") {
        Some(path) => QueryConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load configuration from '{}'", path))?,
        None => QueryConfig::default(),
    };

    let layout = if matches.get_flag("nested") {
        FolderLayout::Nested
    } else {
        FolderLayout::Classic
    };

    let paths = expand_paths(&patterns)?;
    if paths.is_empty() {
        eprintln!("Error: No folders matched {:?}", patterns);
        std::process::exit(1);
    }

    let processed = if matches.get_flag("batch") {
        let options = BatchOptions {
            layout,
            recurse: matches.get_flag("recursive"),
        };
        run_batch(&paths, &matches, &options, &config)?
    } else {
        run_single(&paths, layout, &config)
    };

    if processed == 0 {
        eprintln!("Error: No SAPOS query line was produced.");
        eprintln!("Use --debug for detection and extraction details.");
        std::process::exit(1);
    }

    Ok(())
}
