//! Version catalogs built from a directory tree or a flat property mapping.

use std::collections::{BTreeMap, HashMap};
use std::path::{self, MAIN_SEPARATOR, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{JarError, Result};

use super::version::{JarType, VersionRecord, resolve_version, resolve_version_in};

/// File extension of cataloged archives, matched case-insensitively.
pub const ARCHIVE_EXTENSION: &str = ".jar";

/// Mapping from catalog key to the archive's version record.
///
/// A `None` record marks an archive that was found but declares no version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, Option<VersionRecord>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, record: Option<VersionRecord>) -> Option<Option<VersionRecord>> {
        self.entries.insert(key.into(), record)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Record stored under `key`; `None` also when the archive has no version.
    pub fn get(&self, key: &str) -> Option<&VersionRecord> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&VersionRecord>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

impl IntoIterator for Catalog {
    type Item = (String, Option<VersionRecord>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Option<VersionRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Option<VersionRecord>)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Option<VersionRecord>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Path suffixes whose directories are pruned from a tree walk.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    suffixes: Vec<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `path` ends with any non-empty suffix.
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && path.ends_with(suffix.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            suffixes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Catalog every `.jar` under `root`, keyed by path relative to `root`.
///
/// Directories whose absolute path ends with an exclusion suffix are pruned
/// together with everything below them. If `root` is itself a `.jar` file it
/// is cataloged alone under its file name.
///
/// # Errors
///
/// - [`JarError::InvalidArgument`] for an empty root
/// - [`JarError::NotFound`] if `root` does not exist
/// - any error resolving an individual archive
pub fn build_from_tree(root: impl AsRef<Path>, exclusions: &ExclusionSet) -> Result<Catalog> {
    let root = root.as_ref();
    if root.as_os_str().is_empty() {
        return Err(JarError::invalid_argument("root folder must not be empty"));
    }
    // Collecting the components drops a trailing separator
    let root: PathBuf = path::absolute(root)
        .map_err(|source| JarError::NotFound {
            path: root.to_path_buf(),
            source,
        })?
        .components()
        .collect();
    let metadata = root.metadata().map_err(|source| JarError::NotFound {
        path: root.clone(),
        source,
    })?;

    if !metadata.is_dir() {
        let mut catalog = Catalog::new();
        if is_archive(&root) {
            let key = root
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            catalog.insert(key, resolve_version(&root)?);
        }
        return Ok(catalog);
    }

    WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclusions))
        .try_fold(Catalog::new(), |mut catalog, entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping unreadable entry: {err}");
                    return Ok(catalog);
                }
            };
            if entry.file_type().is_file() && is_archive(entry.path()) {
                let record = resolve_version_in(&root, entry.path())?;
                let key = relative_key(&root, entry.path());
                log::debug!("cataloged {key}: {:?}", record.as_ref().map(|r| &r.version));
                catalog.insert(key, record);
            }
            Ok(catalog)
        })
}

fn is_excluded(entry: &DirEntry, exclusions: &ExclusionSet) -> bool {
    let excluded = entry.file_type().is_dir() && exclusions.matches(entry.path());
    if excluded {
        log::debug!("pruning {}", entry.path().display());
    }
    excluded
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            name.to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(ARCHIVE_EXTENSION)
        })
        .unwrap_or(false)
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Suffix tokens grouping flat property keys into version records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyConvention {
    pub version_suffix: String,
    pub filename_suffix: String,
    pub path_suffix: String,
    pub type_suffix: String,
}

impl Default for PropertyConvention {
    fn default() -> Self {
        Self {
            version_suffix: ".version".to_string(),
            filename_suffix: ".filename".to_string(),
            path_suffix: ".path".to_string(),
            type_suffix: ".type".to_string(),
        }
    }
}

impl PropertyConvention {
    pub fn with_version_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.version_suffix = suffix.into();
        self
    }

    pub fn with_filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filename_suffix = suffix.into();
        self
    }

    pub fn with_path_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.path_suffix = suffix.into();
        self
    }

    pub fn with_type_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_suffix = suffix.into();
        self
    }

    /// Assemble the record whose version is stored under `key`, or `None`
    /// if `key` does not end with the version suffix.
    fn record_for(&self, key: &str, properties: &HashMap<String, String>) -> Result<Option<(String, VersionRecord)>> {
        let Some(root) = key.strip_suffix(self.version_suffix.as_str()) else {
            return Ok(None);
        };
        let sibling = |suffix: &str| properties.get(&format!("{root}{suffix}")).map(String::as_str);

        let file_name = sibling(&self.filename_suffix).unwrap_or_default();
        let path = sibling(&self.path_suffix)
            .map(directory_prefix)
            .unwrap_or_default();
        let jar_type = JarType::from_declared(sibling(&self.type_suffix))?;

        let name = format!("{path}{file_name}");
        let version = properties.get(key).cloned().unwrap_or_default();
        Ok(Some((name.clone(), VersionRecord::new(version, name, jar_type))))
    }
}

/// Normalize separators and terminate a non-empty path with one.
fn directory_prefix(path: &str) -> String {
    let mut normalized = normalize_separators(path);
    if !normalized.is_empty() && !normalized.ends_with(MAIN_SEPARATOR) {
        normalized.push(MAIN_SEPARATOR);
    }
    normalized
}

/// Replace `/` and `\` with the platform separator.
pub fn normalize_separators(path: &str) -> String {
    path.chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

/// Catalog the records declared by the default [`PropertyConvention`].
pub fn build_from_properties(properties: &HashMap<String, String>) -> Result<Catalog> {
    build_from_properties_with(properties, &PropertyConvention::default())
}

/// Catalog the records declared in `properties` under `convention`.
///
/// Every key ending with the version suffix yields one record keyed by
/// `path + file name`. A mapping without such keys yields an empty catalog.
///
/// # Errors
///
/// [`JarError::InvalidArgument`] for an empty version suffix and
/// [`JarError::InvalidType`] for an unknown declared type.
pub fn build_from_properties_with(
    properties: &HashMap<String, String>,
    convention: &PropertyConvention,
) -> Result<Catalog> {
    if convention.version_suffix.is_empty() {
        return Err(JarError::invalid_argument("version suffix must not be empty"));
    }

    properties.keys().try_fold(Catalog::new(), |mut catalog, key| {
        if let Some((name, record)) = convention.record_for(key, properties)? {
            catalog.insert(name, Some(record));
        }
        Ok(catalog)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn groups_sibling_keys() {
        let catalog = build_from_properties(&props(&[
            ("app.version", "1.0"),
            ("app.filename", "app.jar"),
            ("app.path", "lib"),
        ]))
        .unwrap();

        let key = format!("lib{MAIN_SEPARATOR}app.jar");
        assert_eq!(catalog.len(), 1);
        let record = catalog.get(&key).unwrap();
        assert_eq!(record.version, "1.0");
        assert_eq!(record.display_name, key);
        assert_eq!(record.jar_type, JarType::Jar);
    }

    #[test]
    fn normalizes_and_terminates_paths() {
        let catalog = build_from_properties(&props(&[
            ("web.version", "3"),
            ("web.filename", "web.war"),
            ("web.path", r"deploy\apps/"),
            ("web.type", "war"),
        ]))
        .unwrap();

        let key = format!("deploy{MAIN_SEPARATOR}apps{MAIN_SEPARATOR}web.war");
        let record = catalog.get(&key).unwrap();
        assert_eq!(record.jar_type, JarType::War);
    }

    #[test]
    fn missing_fields_stay_empty() {
        let catalog = build_from_properties(&props(&[
            ("a.version", "1"),
            ("b.version", "2"),
            ("b.filename", "b.jar"),
            ("b.type", " "),
        ]))
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("").unwrap().version, "1");
        assert_eq!(catalog.get("b.jar").unwrap().jar_type, JarType::Jar);
    }

    #[test]
    fn custom_suffixes() {
        let convention = PropertyConvention::default()
            .with_version_suffix("_v")
            .with_filename_suffix("_f")
            .with_path_suffix("_p")
            .with_type_suffix("_t");
        let catalog = build_from_properties_with(
            &props(&[("core_v", "9"), ("core_f", "core.jar"), ("core.version", "ignored")]),
            &convention,
        )
        .unwrap();

        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["core.jar"]);
    }

    #[test]
    fn no_version_keys_is_empty() {
        let catalog = build_from_properties(&props(&[("app.filename", "app.jar")])).unwrap();
        assert!(catalog.is_empty());
        assert!(build_from_properties(&HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        let convention = PropertyConvention::default().with_version_suffix("");
        assert!(matches!(
            build_from_properties_with(&props(&[("a.version", "1")]), &convention),
            Err(JarError::InvalidArgument(_))
        ));
        assert!(matches!(
            build_from_properties(&props(&[("a.version", "1"), ("a.type", "zip")])),
            Err(JarError::InvalidType(_))
        ));
    }

    #[test]
    fn exclusion_suffixes_ignore_empty_members() {
        let exclusions: ExclusionSet = ["", "vendor"].into_iter().collect();
        assert!(exclusions.matches(Path::new("/srv/app/vendor")));
        assert!(!exclusions.matches(Path::new("/srv/app/lib")));
        assert!(!ExclusionSet::new().matches(Path::new("/srv")));
    }

    #[test]
    fn catalog_last_write_wins() {
        let mut catalog = Catalog::new();
        catalog.insert("a.jar", None);
        catalog.insert("a.jar", Some(VersionRecord::new("2", "a.jar", JarType::Jar)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a.jar").unwrap().version, "2");
        assert!(catalog.contains_key("a.jar"));
    }
}
