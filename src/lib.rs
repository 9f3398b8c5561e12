//! # jarcat
//!
//! Extract JAR archives and catalog the versions declared in their manifests.
//!
//! This library reads ZIP containers carrying a `META-INF/MANIFEST.MF`,
//! recreates their directory structure on disk, and collects the
//! `Implementation-Version` / `Jar-Type` attributes of many archives into a
//! [`Catalog`], either by walking a directory tree or from a flat property
//! mapping that follows a key-suffix convention.
//!
//! ## Features
//!
//! - Extract archives, optionally leaving out `META-INF`
//! - Manifest attribute lookup with fallback to per-entry sections
//! - Recursive catalog of a deployment tree with excluded subtrees
//! - Catalog of `<name>.version` / `.filename` / `.path` / `.type` properties
//! - ZIP64, STORED and DEFLATE archives
//!
//! ## Example
//!
//! ```no_run
//! use jarcat::{ExclusionSet, build_from_tree};
//!
//! fn main() -> jarcat::Result<()> {
//!     let exclusions: ExclusionSet = ["vendor"].into_iter().collect();
//!     let catalog = build_from_tree("/opt/app/lib", &exclusions)?;
//!     for (key, record) in catalog.iter() {
//!         match record {
//!             Some(record) => println!("{key}: {}", record.version),
//!             None => println!("{key}: no version"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod jar;
pub mod zip;

pub use crate::cli::Cli;
pub use crate::error::{JarError, Result};
pub use crate::io::{LocalFileReader, ReadAt};
pub use crate::jar::{
    Catalog, ExclusionSet, ExtractReport, Extractor, JarArchive, JarType, Manifest,
    PropertyConvention, VersionRecord, build_from_properties, build_from_properties_with,
    build_from_tree, extract, extract_all, resolve_version, resolve_version_in,
};
// `crate::` keeps these distinct from the `zip` dev-dependency.
pub use crate::zip::{ZipFileEntry, ZipParser};
