//! Parser for the JAR manifest text format (`META-INF/MANIFEST.MF`).
//!
//! A manifest is a main attribute section followed by zero or more
//! per-entry sections, separated by blank lines. Every per-entry section
//! starts with a `Name:` header. Lines beginning with a single space
//! continue the value of the previous attribute.

use std::str::FromStr;

use thiserror::Error;

/// Archive path of the manifest, compared case-insensitively.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Malformed manifest text.
#[derive(Debug, Error)]
#[error("manifest line {line}: {message}")]
pub struct ManifestError {
    pub line: usize,
    pub message: String,
}

/// Ordered attribute list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Value of `name`. A repeated attribute resolves to its last value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A per-entry section: the `Name:` it applies to and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub attributes: Attributes,
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    sections: Vec<Section>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut manifest = Manifest::default();
        let mut current = Attributes::default();
        let mut in_main = true;
        let mut last_line = 0;

        for (index, line) in lines(text).enumerate() {
            let line_no = index + 1;
            last_line = line_no;

            if line.is_empty() {
                if in_main {
                    manifest.main = std::mem::take(&mut current);
                    in_main = false;
                } else if !current.is_empty() {
                    manifest.push_section(std::mem::take(&mut current), line_no)?;
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix(' ') {
                let Some((_, value)) = current.entries.last_mut() else {
                    return Err(ManifestError {
                        line: line_no,
                        message: "continuation line without a preceding header".to_string(),
                    });
                };
                value.push_str(rest);
                continue;
            }

            let (name, value) = parse_header(line).ok_or_else(|| ManifestError {
                line: line_no,
                message: format!("invalid header {line:?}"),
            })?;

            if !in_main && current.is_empty() && !name.eq_ignore_ascii_case("Name") {
                return Err(ManifestError {
                    line: line_no,
                    message: "entry section must start with a Name header".to_string(),
                });
            }
            current.entries.push((name.to_string(), value.to_string()));
        }

        if in_main {
            manifest.main = current;
        } else if !current.is_empty() {
            manifest.push_section(current, last_line)?;
        }

        Ok(manifest)
    }

    fn push_section(&mut self, mut attributes: Attributes, line: usize) -> Result<(), ManifestError> {
        if attributes.entries.is_empty() {
            return Err(ManifestError {
                line,
                message: "empty entry section".to_string(),
            });
        }
        let (_, name) = attributes.entries.remove(0);
        self.sections.push(Section { name, attributes });
        Ok(())
    }

    /// Attributes of the main section.
    pub fn main(&self) -> &Attributes {
        &self.main
    }

    /// Per-entry sections in declaration order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look `name` up in the main section, falling back to the per-entry
    /// sections in declaration order.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.main.get(name).or_else(|| {
            self.sections
                .iter()
                .find_map(|section| section.attributes.get(name))
        })
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Manifest::parse(s)
    }
}

/// Split on `\r\n`, `\n` or a lone `\r`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text);
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
        .filter(move |_| !text.is_empty())
}

fn parse_header(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_and_entry_sections() {
        let text = "Manifest-Version: 1.0\r\n\
                    Implementation-Version: 2.3.1\r\n\
                    \r\n\
                    Name: org/reichel/\r\n\
                    Jar-Type: war\r\n\
                    \r\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(manifest.main().get("implementation-version"), Some("2.3.1"));
        assert_eq!(manifest.sections().len(), 1);
        assert_eq!(manifest.sections()[0].name, "org/reichel/");
        assert_eq!(manifest.sections()[0].attributes.get("Jar-Type"), Some("war"));
        assert_eq!(manifest.sections()[0].attributes.get("Name"), None);
    }

    #[test]
    fn joins_continuation_lines() {
        let text = "Manifest-Version: 1.0\n\
                    Class-Path: lib/a.jar\n lib/b.jar\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(
            manifest.main().get("Class-Path"),
            Some("lib/a.jarlib/b.jar")
        );
    }

    #[test]
    fn falls_back_to_sections_in_order() {
        let text = "Manifest-Version: 1.0\n\
                    \n\
                    Name: first\n\
                    Implementation-Version: 1.0\n\
                    \n\
                    Name: second\n\
                    Implementation-Version: 2.0\n";
        let manifest = Manifest::parse(text).unwrap();
        assert_eq!(manifest.main().get("Implementation-Version"), None);
        assert_eq!(manifest.attribute("Implementation-Version"), Some("1.0"));
        assert_eq!(manifest.attribute("Missing"), None);
    }

    #[test]
    fn main_section_wins_over_sections() {
        let text = "Implementation-Version: main\n\nName: x\nImplementation-Version: entry\n";
        let manifest: Manifest = text.parse().unwrap();
        assert_eq!(manifest.attribute("Implementation-Version"), Some("main"));
    }

    #[test]
    fn accepts_empty_values_and_lone_cr() {
        let manifest = Manifest::parse("Jar-Type: \rImplementation-Version: 1").unwrap();
        assert_eq!(manifest.main().get("Jar-Type"), Some(""));
        assert_eq!(manifest.main().get("Implementation-Version"), Some("1"));
    }

    #[test]
    fn empty_text_is_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();
        assert!(manifest.main().is_empty());
        assert!(manifest.sections().is_empty());
    }

    #[test]
    fn rejects_malformed_headers() {
        let err = Manifest::parse("Manifest-Version 1.0\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = Manifest::parse(" dangling\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = Manifest::parse("A: b\n\nJar-Type: jar\n").unwrap_err();
        assert_eq!(err.line, 3);
    }
}
