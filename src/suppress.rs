//! Suppression directive parsing
//!
//! A statement can disable rules for itself with a line comment inside its
//! own source text:
//!
//! ```sql
//! -- pgcheck_nolint:drop-column,drop-table
//! ALTER TABLE t DROP COLUMN v;
//! ```
//!
//! `-- nolint:` is accepted as a short form. A directive only applies to the
//! statement whose byte range contains it; a comment that belongs to a
//! neighboring statement never suppresses anything here.

use std::collections::HashSet;

use crate::rules::Finding;

/// Directive markers, longest first.
const MARKERS: [&str; 2] = ["-- pgcheck_nolint:", "-- nolint:"];

/// Rule codes disabled by the directives in one statement.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Suppressions {
    codes: HashSet<String>,
}

impl Suppressions {
    /// Collect directives from a statement's raw source text.
    ///
    /// The text is trimmed and split into lines. Each line that starts with a
    /// marker contributes the comma-separated codes in the first
    /// whitespace-delimited token after it.
    pub fn parse(statement: &str) -> Self {
        let normalized = statement.trim().replace("\r\n", "\n");
        let mut codes = HashSet::new();

        for line in normalized.split('\n') {
            let Some(rest) = MARKERS.iter().find_map(|m| line.strip_prefix(m)) else {
                continue;
            };
            let Some(token) = rest.split_whitespace().next() else {
                continue;
            };
            codes.extend(
                token
                    .split(',')
                    .filter(|code| !code.is_empty())
                    .map(str::to_string),
            );
        }

        Self { codes }
    }

    pub fn is_suppressed(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Drop every finding whose own statement suppresses its rule.
///
/// Only `source[stmt_start..stmt_end]` is examined for each finding. Order of
/// the surviving findings is preserved.
pub fn filter_suppressed(source: &str, findings: Vec<Finding>) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| {
            let statement = source.get(f.stmt_start..f.stmt_end).unwrap_or_default();
            !Suppressions::parse(statement).is_suppressed(f.rule_id.as_str())
        })
        .collect()
}
