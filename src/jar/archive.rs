use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{JarError, Result};
use crate::io::LocalFileReader;
use crate::zip::{CentralDirectory, EntryReader, ZipFileEntry, ZipParser};

use super::manifest::{MANIFEST_PATH, Manifest};

/// An open JAR (or any ZIP) archive on the local filesystem.
///
/// The file handle is held for the lifetime of the value and released when
/// it is dropped or passed to [`JarArchive::close`], so every early return
/// through `?` closes the archive as well.
pub struct JarArchive {
    path: PathBuf,
    parser: ZipParser<LocalFileReader>,
}

impl JarArchive {
    /// Open the archive at `path` and check that it is a readable ZIP container.
    ///
    /// # Errors
    ///
    /// - [`JarError::InvalidArgument`] for an empty path
    /// - [`JarError::NotFound`] if the file is missing or cannot be opened
    /// - [`JarError::CorruptArchive`] if no End of Central Directory is found
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(JarError::invalid_argument("archive path must not be empty"));
        }

        let reader = LocalFileReader::new(path).map_err(|source| JarError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let parser = ZipParser::new(reader);
        parser.find_eocd().map_err(|e| JarError::corrupt(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            parser,
        })
    }

    /// Filesystem path the archive was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enumerate the archive's entries in Central Directory order.
    pub fn entries(&self) -> Result<Entries<'_>> {
        let inner = self
            .parser
            .entries()
            .map_err(|e| JarError::corrupt(&self.path, e))?;
        Ok(Entries {
            inner,
            path: &self.path,
        })
    }

    /// Open a stream over the content of `entry`.
    pub fn open_entry(&self, entry: &ZipFileEntry) -> io::Result<EntryReader<'_, LocalFileReader>> {
        self.parser.open_entry(entry)
    }

    /// Read and parse `META-INF/MANIFEST.MF`, if the archive has one.
    pub fn manifest(&self) -> Result<Option<Manifest>> {
        let mut found = None;
        for entry in self.entries()? {
            let entry = entry?;
            if !entry.is_directory && entry.file_name.eq_ignore_ascii_case(MANIFEST_PATH) {
                found = Some(entry);
                break;
            }
        }
        let Some(entry) = found else {
            return Ok(None);
        };

        let mut raw = Vec::with_capacity(entry.uncompressed_size.min(1 << 20) as usize);
        self.open_entry(&entry)
            .and_then(|mut reader| reader.read_to_end(&mut raw))
            .map_err(|e| JarError::corrupt(&self.path, format!("{MANIFEST_PATH}: {e}")))?;

        let text = String::from_utf8(raw)
            .map_err(|e| JarError::corrupt(&self.path, format!("{MANIFEST_PATH}: {e}")))?;
        let manifest = Manifest::parse(&text).map_err(|e| JarError::corrupt(&self.path, e))?;

        Ok(Some(manifest))
    }

    /// Value of manifest attribute `name`.
    ///
    /// The main section is searched first; if the attribute is absent there
    /// the per-entry sections are searched in declaration order. Returns
    /// `None` when no section declares it or the archive has no manifest.
    pub fn read_attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .manifest()?
            .and_then(|manifest| manifest.attribute(name).map(str::to_string)))
    }

    /// Release the underlying file handle.
    pub fn close(self) {
        drop(self);
    }
}

/// Lazy enumeration of archive entries; see [`JarArchive::entries`].
pub struct Entries<'a> {
    inner: CentralDirectory,
    path: &'a Path,
}

impl Iterator for Entries<'_> {
    type Item = Result<ZipFileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| entry.map_err(|e| JarError::corrupt(self.path, e)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
