//! Violation reports
//!
//! Surviving findings are enriched with their file, statement text and line
//! number, collected into a [`Report`], and rendered as text or JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

use crate::rules::{Category, Finding, Rule, RuleId};

pub mod json;
pub mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown output format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),
}

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Output options
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub colored: bool,
}

impl OutputOptions {
    /// The reporter for this format.
    pub fn reporter(&self) -> Box<dyn Reporter> {
        match self.format {
            OutputFormat::Text => Box::new(TextReporter::new(self.colored)),
            OutputFormat::Json => Box::new(JsonReporter),
        }
    }
}

/// A finding that survived suppression, ready for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub file: String,
    pub code: RuleId,
    pub statement: String,
    pub statement_line: usize,
    pub slug: String,
    pub help: String,
}

impl Violation {
    pub fn new(file: impl Into<String>, source: &str, finding: &Finding) -> Self {
        let span = source
            .get(finding.stmt_start..finding.stmt_end)
            .unwrap_or_default();
        Self {
            file: file.into(),
            code: finding.rule_id,
            statement: span.trim().to_string(),
            statement_line: statement_line(source, finding.stmt_start, finding.stmt_end),
            slug: finding.slug.to_string(),
            help: finding.help.to_string(),
        }
    }
}

/// 1-based line of the first non-blank line of `source[start..end]`.
///
/// Lines before the span are counted from the source; leading lines of the
/// span that are empty or whitespace-only are skipped.
pub fn statement_line(source: &str, start: usize, end: usize) -> usize {
    let preceding = source.get(..start).unwrap_or_default().matches('\n').count();
    let span = source.get(start..end).unwrap_or_default();
    let blank = span
        .split('\n')
        .take_while(|line| line.trim().is_empty())
        .count()
        .min(span.matches('\n').count());
    preceding + 1 + blank
}

/// Ordered violations for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    violations: Vec<Violation>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Number of distinct files with at least one violation.
    pub fn file_count(&self) -> usize {
        self.violations
            .iter()
            .map(|v| v.file.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Catalog entry for `pgcheck rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub code: RuleId,
    pub slug: &'static str,
    pub help: &'static str,
    pub category: Category,
    pub enabled_by_default: bool,
}

impl RuleInfo {
    pub fn from_rule(rule: &dyn Rule) -> Self {
        Self {
            code: rule.id(),
            slug: rule.slug(),
            help: rule.help(),
            category: rule.category(),
            enabled_by_default: rule.enabled_by_default(),
        }
    }
}

/// Trait for output format reporters.
pub trait Reporter {
    /// Render a run's violations.
    fn render(&self, report: &Report) -> Result<String, ReportError>;

    /// Render the rule catalog.
    fn render_rules(&self, rules: &[RuleInfo]) -> Result<String, ReportError>;
}
