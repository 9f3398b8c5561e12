//! Replays archive entries onto a directory tree.
//!
//! Directory-structure failures abort the extraction; failures reading or
//! writing a single file are collected in the [`ExtractReport`] and the
//! remaining entries are still extracted.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{JarError, Result};
use crate::zip::ZipFileEntry;

use super::archive::JarArchive;

/// Path segment marking packaging metadata.
pub const METADATA_MARKER: &str = "META-INF";

const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Outcome of one extraction.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in archive order.
    pub written: Vec<PathBuf>,
    /// Total bytes written across `written`.
    pub bytes_written: u64,
    /// Entry names skipped by the metadata filter.
    pub skipped: Vec<String>,
    /// Per-entry failures; each is a [`JarError::EntryIo`].
    pub failures: Vec<JarError>,
}

impl ExtractReport {
    /// True when every selected entry was extracted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Archive extractor.
///
/// ```no_run
/// use jarcat::Extractor;
///
/// let report = Extractor::default().extract("app.jar", "out", false)?;
/// println!("{} files", report.written.len());
/// # Ok::<(), jarcat::JarError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    metadata_marker: String,
    buffer_size: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            metadata_marker: METADATA_MARKER.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Extractor {
    pub fn with_metadata_marker(mut self, marker: impl Into<String>) -> Self {
        self.metadata_marker = marker.into();
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Extract every entry of `archive_path` under `target_dir`.
    ///
    /// When `include_metadata` is false, entries whose name contains the
    /// metadata marker are neither read nor given directories.
    ///
    /// # Errors
    ///
    /// - [`JarError::InvalidArgument`] for an empty archive path or target
    /// - errors of [`JarArchive::open`] and corrupt Central Directory headers
    /// - [`JarError::DirectoryCreation`] if an output directory cannot be created
    pub fn extract(
        &self,
        archive_path: impl AsRef<Path>,
        target_dir: impl AsRef<Path>,
        include_metadata: bool,
    ) -> Result<ExtractReport> {
        let archive_path = archive_path.as_ref();
        let target_dir = target_dir.as_ref();
        if archive_path.as_os_str().is_empty() {
            return Err(JarError::invalid_argument("archive path must not be empty"));
        }
        if target_dir.as_os_str().is_empty() {
            return Err(JarError::invalid_argument("target directory must not be empty"));
        }

        let archive = JarArchive::open(archive_path)?;
        let mut report = ExtractReport::default();

        for entry in archive.entries()? {
            let entry = entry?;

            if !include_metadata
                && !self.metadata_marker.is_empty()
                && entry.file_name.contains(&self.metadata_marker)
            {
                log::debug!("skipping metadata entry {}", entry.file_name);
                report.skipped.push(entry.file_name);
                continue;
            }

            let target = match target_path(target_dir, &entry.file_name) {
                Ok(target) => target,
                Err(source) => {
                    log::warn!("refusing to extract {}: {source}", entry.file_name);
                    report.failures.push(JarError::EntryIo {
                        entry: entry.file_name,
                        source,
                    });
                    continue;
                }
            };

            if entry.is_directory {
                ensure_dir(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }

            match self.copy_entry(&archive, &entry, &target) {
                Ok(bytes) => {
                    report.bytes_written += bytes;
                    report.written.push(target);
                }
                Err(source) => {
                    log::warn!("failed to extract {}: {source}", entry.file_name);
                    report.failures.push(JarError::EntryIo {
                        entry: entry.file_name,
                        source,
                    });
                }
            }
        }

        archive.close();
        Ok(report)
    }

    fn copy_entry(&self, archive: &JarArchive, entry: &ZipFileEntry, target: &Path) -> io::Result<u64> {
        let mut reader = archive.open_entry(entry)?;
        let mut output = File::create(target)?;
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total = 0u64;

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            output.write_all(&buffer[..n])?;
            total += n as u64;
        }

        output.flush()?;
        Ok(total)
    }
}

/// Extract with the default [`Extractor`].
pub fn extract(
    archive_path: impl AsRef<Path>,
    target_dir: impl AsRef<Path>,
    include_metadata: bool,
) -> Result<ExtractReport> {
    Extractor::default().extract(archive_path, target_dir, include_metadata)
}

/// Extract everything, metadata included.
pub fn extract_all(archive_path: impl AsRef<Path>, target_dir: impl AsRef<Path>) -> Result<ExtractReport> {
    extract(archive_path, target_dir, true)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| JarError::DirectoryCreation {
        path: dir.to_path_buf(),
        source,
    })
}

/// Map an entry name onto `target_dir`.
///
/// Both `/` and `\` separate segments; empty and `.` segments are dropped.
/// Names that would escape `target_dir` are rejected.
fn target_path(target_dir: &Path, entry_name: &str) -> io::Result<PathBuf> {
    let mut path = target_dir.to_path_buf();
    for segment in entry_name.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "entry name escapes the target directory",
                ));
            }
            _ => {
                if Path::new(segment)
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
                {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "entry name contains an absolute path component",
                    ));
                }
                path.push(segment);
            }
        }
    }
    Ok(path)
}
