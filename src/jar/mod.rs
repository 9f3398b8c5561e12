//! JAR-level operations on top of the ZIP container layer.
//!
//! - [`archive`]: open an archive, enumerate entries, look up manifest attributes
//! - [`manifest`]: the `META-INF/MANIFEST.MF` text format
//! - [`extract`]: recreate an archive's tree on disk
//! - [`version`]: version records from `Implementation-Version` / `Jar-Type`
//! - [`catalog`]: catalogs over a directory walk or a flat property mapping

pub mod archive;
pub mod catalog;
pub mod extract;
pub mod manifest;
pub mod version;

pub use archive::{Entries, JarArchive};
pub use catalog::{
    ARCHIVE_EXTENSION, Catalog, ExclusionSet, PropertyConvention, build_from_properties,
    build_from_properties_with, build_from_tree, normalize_separators,
};
pub use extract::{ExtractReport, Extractor, METADATA_MARKER, extract, extract_all};
pub use manifest::{Attributes, MANIFEST_PATH, Manifest, ManifestError, Section};
pub use version::{
    IMPLEMENTATION_VERSION, JAR_TYPE, JarType, VersionRecord, resolve_version, resolve_version_in,
};
