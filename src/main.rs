//! Main entry point for the jarcat CLI application.
//!
//! This binary exposes archive listing, extraction, single-archive version
//! lookup and the two catalog builders on the command line.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;

use jarcat::cli::Command;
use jarcat::{
    Catalog, Cli, ExclusionSet, JarArchive, PropertyConvention, build_from_properties_with,
    build_from_tree, extract, resolve_version,
};

/// Application entry point.
///
/// Parses command-line arguments, installs the logger and dispatches to the
/// handler of the selected subcommand.
fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_target(false)
        .init();

    match cli.command {
        Command::List { file, verbose } => list_files(&file, verbose),
        Command::Extract {
            file,
            extract_dir,
            skip_metadata,
        } => {
            let report = extract(&file, &extract_dir, !skip_metadata)
                .with_context(|| format!("failed to extract {file}"))?;

            log::info!(
                "extracted {} files ({}) into {}",
                report.written.len(),
                format_size(report.bytes_written),
                extract_dir
            );
            if !report.skipped.is_empty() {
                log::info!("skipped {} metadata entries", report.skipped.len());
            }
            if !report.is_complete() {
                for failure in &report.failures {
                    match std::error::Error::source(failure) {
                        Some(cause) => log::error!("{failure}: {cause}"),
                        None => log::error!("{failure}"),
                    }
                }
                anyhow::bail!("{} entries could not be extracted", report.failures.len());
            }
            Ok(())
        }
        Command::Version { file } => {
            match resolve_version(&file).with_context(|| format!("failed to read {file}"))? {
                Some(record) => println!("{}\t{}\t{}", record.display_name, record.version, record.jar_type),
                None => println!("{file}\t-\t-"),
            }
            Ok(())
        }
        Command::Scan { root, exclude } => {
            let exclusions: ExclusionSet = exclude.into_iter().collect();
            let catalog = build_from_tree(&root, &exclusions)
                .with_context(|| format!("failed to catalog {root}"))?;
            print_catalog(&catalog);
            Ok(())
        }
        Command::Properties {
            properties,
            version_suffix,
            filename_suffix,
            path_suffix,
            type_suffix,
        } => {
            let convention = PropertyConvention::default()
                .with_version_suffix(version_suffix)
                .with_filename_suffix(filename_suffix)
                .with_path_suffix(path_suffix)
                .with_type_suffix(type_suffix);
            let mapping: HashMap<String, String> = properties.into_iter().collect();
            let catalog = build_from_properties_with(&mapping, &convention)?;
            print_catalog(&catalog);
            Ok(())
        }
    }
}

/// Print one catalog line per archive: key, version, type.
fn print_catalog(catalog: &Catalog) {
    for (key, record) in catalog.iter() {
        match record {
            Some(record) => println!("{key}\t{}\t{}", record.version, record.jar_type),
            None => println!("{key}\t-\t-"),
        }
    }
}

/// List entries in the archive.
///
/// Supports two output formats:
/// - Simple format: Just entry names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio and timestamps
fn list_files(file: &str, verbose: bool) -> Result<()> {
    let archive = JarArchive::open(file).with_context(|| format!("failed to open {file}"))?;

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    // Track totals for summary line
    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in archive.entries()? {
        let entry = entry?;
        if !verbose {
            println!("{}", entry.file_name);
            continue;
        }

        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            compression_ratio(entry.compressed_size, entry.uncompressed_size),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        if !entry.is_directory {
            total_uncompressed = total_uncompressed.saturating_add(entry.uncompressed_size);
            total_compressed = total_compressed.saturating_add(entry.compressed_size);
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed,
            total_compressed,
            compression_ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }

    archive.close();
    Ok(())
}

/// Percentage saved by compression, right-aligned to five columns.
fn compression_ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        let kept = u128::from(compressed) * 100 / u128::from(uncompressed);
        format!("{:>4}%", 100 - kept)
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
