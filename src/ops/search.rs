//! Searching the decrypted working copy.

use super::Passkeeper;
use crate::document::{Section, SecretDocument};
use crate::errors::AppResult;
use serde::Serialize;
use std::fs;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// One matching section, identified by file and section name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionMatch {
    pub file: String,
    pub section: String,
}

/// Outcome of [`Passkeeper::search`].
///
/// `matches` is ordered by file, then by section within the file. `documents`
/// holds every parsed file so matched sections can be displayed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub documents: Vec<SecretDocument>,
    pub matches: Vec<SectionMatch>,
}

impl SearchResults {
    /// Matching section names, in match order.
    pub fn section_names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.section.as_str()).collect()
    }

    /// The parsed section a match refers to.
    pub fn lookup(&self, m: &SectionMatch) -> Option<&Section> {
        self.documents
            .iter()
            .find(|doc| doc.name == m.file)
            .and_then(|doc| doc.section(&m.section))
    }

    /// Matched sections, in match order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.matches.iter().filter_map(move |m| self.lookup(m))
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Passkeeper {
    /// Finds sections of the plaintext files containing `pattern`, ignoring case.
    ///
    /// A section matches when the pattern occurs in its name or in any of its
    /// keys or values. Only the decrypted working copy is searched, so run
    /// [`Passkeeper::decrypt`] first. Listed entries that are no longer regular
    /// files contribute nothing.
    ///
    /// # Errors
    ///
    /// Unreadable files and malformed documents propagate.
    pub fn search(&self, pattern: &str) -> AppResult<SearchResults> {
        let mut results = SearchResults::default();

        for name in self.files().plaintext_files()? {
            let path = self.store.plaintext_path(&name);
            if !path.is_file() {
                debug!("Skipping {:?}: not a regular file", name);
                continue;
            }

            let content = Zeroizing::new(fs::read_to_string(&path)?);
            let document = SecretDocument::parse(&name, &content)?;

            results.matches.extend(
                document
                    .matching_sections(pattern)
                    .into_iter()
                    .map(|section| SectionMatch {
                        file: name.clone(),
                        section: section.to_string(),
                    }),
            );
            results.documents.push(document);
        }

        info!(
            "Search matched {} sections in {} files",
            results.matches.len(),
            results.documents.len()
        );
        Ok(results)
    }
}
