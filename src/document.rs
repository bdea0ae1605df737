//! Sectioned key/value secret documents.
//!
//! Plaintext secret files are INI documents: `[section]` headers followed by
//! `key = value` (or `key: value`) lines. Each section usually describes one
//! login or service. Parsing keeps section and entry order so search results
//! and display follow the file.

use crate::errors::DocumentError;
use serde::Serialize;
use std::fmt;

/// One `[section]` of a secret document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    /// Key/value pairs in file order.
    pub entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True if `needle` (already lowercased) occurs in the section name or in
    /// any key or value.
    fn contains_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.entries.iter().any(|(key, value)| {
                key.to_lowercase().contains(needle) || value.to_lowercase().contains(needle)
            })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        for (key, value) in &self.entries {
            // Continuation lines need indentation to round-trip.
            writeln!(f, "{} = {}", key, value.replace('\n', "\n    "))?;
        }
        Ok(())
    }
}

/// A parsed plaintext secret file.
///
/// # Examples
///
/// ```
/// use passkeeper::document::SecretDocument;
///
/// let doc = SecretDocument::parse(
///     "bar.ini",
///     "[github]\nlogin = octocat\npassword = hunter2\n",
/// )?;
/// assert_eq!(doc.sections.len(), 1);
/// assert_eq!(doc.section("github").and_then(|s| s.get("login")), Some("octocat"));
/// assert_eq!(doc.matching_sections("OCTO"), vec!["github"]);
/// # Ok::<(), passkeeper::errors::DocumentError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretDocument {
    /// File name the document was read from, e.g. `bar.ini`.
    pub name: String,
    pub sections: Vec<Section>,
}

impl SecretDocument {
    /// Parses INI text.
    ///
    /// Blank lines and lines starting with `#` or `;` are ignored. Indented lines
    /// continue the previous value. A line without `=` or `:` is a key with an
    /// empty value. Repeated section headers append to the first occurrence.
    ///
    /// # Errors
    ///
    /// - `DocumentError::MissingSectionHeader` for an option before any header
    /// - `DocumentError::MalformedSection` for an unterminated or empty header
    pub fn parse(name: &str, content: &str) -> Result<Self, DocumentError> {
        let mut sections: Vec<Section> = Vec::new();
        let mut current: Option<usize> = None;
        let mut last_key: Option<usize> = None;

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw_line.starts_with(' ') || raw_line.starts_with('\t');
            if indented {
                if let (Some(section), Some(entry)) = (current, last_key) {
                    let value = &mut sections[section].entries[entry].1;
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(trimmed);
                    continue;
                }
            }

            if trimmed.starts_with('[') {
                let header = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|header| !header.is_empty())
                    .ok_or_else(|| DocumentError::MalformedSection {
                        file: name.to_string(),
                        line: line_no,
                    })?;

                let position = match sections.iter().position(|s| s.name == header) {
                    Some(existing) => existing,
                    None => {
                        sections.push(Section::new(header));
                        sections.len() - 1
                    }
                };
                current = Some(position);
                last_key = None;
                continue;
            }

            let section = current.ok_or_else(|| DocumentError::MissingSectionHeader {
                file: name.to_string(),
                line: line_no,
            })?;

            let (key, value) = split_option(trimmed);
            let entries = &mut sections[section].entries;
            entries.push((key.to_string(), value.to_string()));
            last_key = Some(entries.len() - 1);
        }

        Ok(SecretDocument {
            name: name.to_string(),
            sections,
        })
    }

    /// Section by exact name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Names of sections whose name, keys or values contain `pattern`,
    /// ignoring case, in document order.
    pub fn matching_sections(&self, pattern: &str) -> Vec<&str> {
        let needle = pattern.to_lowercase();
        self.sections
            .iter()
            .filter(|section| section.contains_lowercase(&needle))
            .map(|section| section.name.as_str())
            .collect()
    }
}

/// Splits `key = value` / `key: value` on whichever delimiter comes first.
fn split_option(line: &str) -> (&str, &str) {
    match line.find(|c| c == '=' || c == ':') {
        Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
        None => (line, ""),
    }
}
