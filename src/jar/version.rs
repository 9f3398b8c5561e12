//! Version records resolved from manifest attributes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{JarError, Result};

use super::archive::JarArchive;

/// Manifest attribute holding the archive version.
pub const IMPLEMENTATION_VERSION: &str = "Implementation-Version";

/// Manifest attribute declaring the archive type.
pub const JAR_TYPE: &str = "Jar-Type";

/// Kind of deployable archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JarType {
    #[default]
    Jar,
    War,
    Ear,
}

impl JarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JarType::Jar => "JAR",
            JarType::War => "WAR",
            JarType::Ear => "EAR",
        }
    }

    /// Parse an optional declared type. Missing or blank means [`JarType::Jar`].
    pub fn from_declared(declared: Option<&str>) -> Result<Self> {
        match declared.map(str::trim) {
            None | Some("") => Ok(JarType::default()),
            Some(token) => token.parse(),
        }
    }
}

impl FromStr for JarType {
    type Err = JarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JAR" => Ok(JarType::Jar),
            "WAR" => Ok(JarType::War),
            "EAR" => Ok(JarType::Ear),
            _ => Err(JarError::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for JarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version metadata for one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub version: String,
    /// File name or relative path the record is cataloged under.
    pub display_name: String,
    pub jar_type: JarType,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, display_name: impl Into<String>, jar_type: JarType) -> Self {
        Self {
            version: version.into(),
            display_name: display_name.into(),
            jar_type,
        }
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.display_name, self.version, self.jar_type)
    }
}

/// Resolve the version of the archive at `archive_path`.
///
/// The record is keyed by the archive's file name. Returns `Ok(None)` when
/// the manifest has no `Implementation-Version`.
///
/// # Errors
///
/// [`JarError::InvalidArgument`] for an empty path, the errors of
/// [`JarArchive::open`], and [`JarError::InvalidType`] for an unknown
/// `Jar-Type`.
pub fn resolve_version(archive_path: impl AsRef<Path>) -> Result<Option<VersionRecord>> {
    let archive_path = archive_path.as_ref();
    let path_str = archive_path.to_string_lossy();
    if path_str.is_empty() {
        return Err(JarError::invalid_argument("archive path must not be empty"));
    }
    read_record(archive_path, file_name(&path_str).to_string())
}

/// Resolve the version of `archive_path`, keyed by its path relative to `root`.
///
/// # Errors
///
/// [`JarError::InvalidArgument`] if either path is empty or `root` is not a
/// strict ancestor of `archive_path`; otherwise as [`resolve_version`].
pub fn resolve_version_in(
    root: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
) -> Result<Option<VersionRecord>> {
    let root = root.as_ref();
    let archive_path = archive_path.as_ref();
    if archive_path.as_os_str().is_empty() {
        return Err(JarError::invalid_argument("archive path must not be empty"));
    }
    if root.as_os_str().is_empty() {
        return Err(JarError::invalid_argument("root folder must not be empty"));
    }

    let relative = archive_path
        .strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .ok_or_else(|| {
            JarError::invalid_argument(format!(
                "{} is not under {}",
                archive_path.display(),
                root.display()
            ))
        })?;

    read_record(archive_path, relative.to_string_lossy().into_owned())
}

fn read_record(archive_path: &Path, display_name: String) -> Result<Option<VersionRecord>> {
    let archive = JarArchive::open(archive_path)?;
    let manifest = archive.manifest();
    archive.close();
    let Some(manifest) = manifest? else {
        return Ok(None);
    };

    let Some(version) = manifest.attribute(IMPLEMENTATION_VERSION) else {
        return Ok(None);
    };
    let jar_type = JarType::from_declared(manifest.attribute(JAR_TYPE))?;

    Ok(Some(VersionRecord::new(version, display_name, jar_type)))
}

/// Last path segment, accepting both `/` and `\` as separators.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
