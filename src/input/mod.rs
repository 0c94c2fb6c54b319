//! Migration file selection
//!
//! Expands the command-line patterns into the sorted, de-duplicated list of
//! files to lint. Patterns use shell glob syntax; a pattern that names a
//! directory selects the `.sql` files directly inside it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no files found")]
    NoFiles,

    #[error("invalid file pattern '{pattern}'")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("IO error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve `patterns` into the files to lint.
///
/// A pattern matching nothing is not an error on its own; matching nothing
/// across all patterns is [`LoadError::NoFiles`]. Paths that resolve to the
/// same file are kept once, under the first spelling seen.
pub fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, LoadError> {
    let mut by_canonical: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| LoadError::Pattern {
            pattern: pattern.clone(),
            source: e,
        })?;

        let mut matched = 0usize;
        for entry in entries {
            let path = entry.map_err(|e| LoadError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;

            let files = if path.is_dir() {
                collect_sql_files(&path)?
            } else if path.is_file() {
                vec![path]
            } else {
                continue;
            };

            for file in files {
                let canonical = std::fs::canonicalize(&file).map_err(|e| LoadError::Io {
                    path: file.clone(),
                    source: e,
                })?;
                matched += 1;
                by_canonical.entry(canonical).or_insert(file);
            }
        }
        debug!(pattern = %pattern, matched, "expanded pattern");
    }

    if by_canonical.is_empty() {
        return Err(LoadError::NoFiles);
    }

    let mut files: Vec<PathBuf> = by_canonical.into_values().collect();
    files.sort();
    Ok(files)
}

/// Collect all `.sql` files from a directory (non-recursive).
fn collect_sql_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_sql_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}
