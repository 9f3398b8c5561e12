#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Helper: write a ZIP at `path`. Names ending in `/` become directory entries.
pub fn create_test_jar(path: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    create_test_jar_with(path, entries, CompressionMethod::Deflated)
}

pub fn create_test_jar_with(
    path: &Path,
    entries: &[(&str, &[u8])],
    method: CompressionMethod,
) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(method);

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(name.to_string(), options).unwrap();
        } else {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap();
    path.to_path_buf()
}

/// Manifest text with the given main-section attributes.
pub fn manifest(attributes: &[(&str, &str)]) -> Vec<u8> {
    let mut text = String::from("Manifest-Version: 1.0\r\n");
    for (name, value) in attributes {
        text.push_str(&format!("{name}: {value}\r\n"));
    }
    text.push_str("\r\n");
    text.into_bytes()
}

/// A jar whose manifest declares `version` and, optionally, `jar_type`.
pub fn versioned_jar(path: &Path, version: Option<&str>, jar_type: Option<&str>) -> PathBuf {
    let mut attributes = Vec::new();
    if let Some(version) = version {
        attributes.push(("Implementation-Version", version));
    }
    if let Some(jar_type) = jar_type {
        attributes.push(("Jar-Type", jar_type));
    }
    let manifest = manifest(&attributes);
    create_test_jar(
        path,
        &[
            ("META-INF/", b""),
            ("META-INF/MANIFEST.MF", manifest.as_slice()),
            ("com/example/App.class", b"\xca\xfe\xba\xbe"),
        ],
    )
}
