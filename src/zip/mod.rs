//! ZIP archive parsing.
//!
//! This module provides the container layer underneath the JAR
//! operations, supporting both standard ZIP format and ZIP64 extensions.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Parsing of ZIP structures and lazy Central Directory enumeration
//! - [`entry`]: Decompressing, CRC-checked streams over entry content
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod entry;
mod parser;
mod structures;

pub use entry::EntryReader;
pub use parser::{CentralDirectory, ZipParser};
pub use structures::*;
