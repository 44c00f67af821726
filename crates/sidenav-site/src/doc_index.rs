//! Document discovery by filesystem walking.
//!
//! Document ids are paths relative to the docs directory, without the
//! `.md`/`.mdx` extension and with `/` separators (`sdk/auth/overview`).

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::LoadError;

const DOC_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Ids of the documents found in a docs directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocIndex {
    ids: BTreeSet<String>,
}

impl DocIndex {
    /// Walk `source_dir` and collect document ids.
    ///
    /// Hidden entries and entries whose relative path matches one of the
    /// `exclude` globs are skipped; an excluded directory is not descended
    /// into. Returns an empty index if the directory doesn't exist.
    pub fn scan(source_dir: &Path, exclude: &[String]) -> Result<Self, LoadError> {
        let patterns = exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| LoadError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut index = Self::default();
        if source_dir.is_dir() {
            let scanner = Scanner { patterns };
            scanner.scan_directory(source_dir, "", &mut index.ids);
        } else {
            tracing::debug!(dir = %source_dir.display(), "Docs directory not found");
        }
        Ok(index)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Document ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids as the set tree building resolves links against.
    #[must_use]
    pub fn to_known_documents(&self) -> HashSet<String> {
        self.ids.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a str> for DocIndex {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(str::to_owned).collect(),
        }
    }
}

struct Scanner {
    patterns: Vec<Pattern>,
}

impl Scanner {
    fn is_excluded(&self, rel_path: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|p| p.matches_with(rel_path, options))
    }

    fn scan_directory(&self, dir_path: &Path, prefix: &str, ids: &mut BTreeSet<String>) {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %dir_path.display(),
                    error = %e,
                    "Skipping unreadable directory"
                );
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        dir = %dir_path.display(),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let rel_path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };
            if self.is_excluded(&rel_path) {
                continue;
            }

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &rel_path, ids);
            } else if let Some(stem) = doc_stem(&rel_path) {
                ids.insert(stem.to_owned());
            }
        }
    }
}

/// Relative path without its document extension, if it is a document.
fn doc_stem(rel_path: &str) -> Option<&str> {
    let (stem, extension) = rel_path.rsplit_once('.')?;
    let is_doc = DOC_EXTENSIONS
        .iter()
        .any(|e| extension.eq_ignore_ascii_case(e));
    (is_doc && !stem.is_empty() && !stem.ends_with('/')).then_some(stem)
}
