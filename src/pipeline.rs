//! Lint pipeline
//!
//! Per file: read, parse, evaluate every enabled rule, drop suppressed
//! findings, and turn the rest into [`Violation`]s. Files are processed in the
//! order given and any error stops the whole run.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::output::{Report, Violation};
use crate::parser::{IrNode, Located, ParseError, parse_sql};
use crate::rules::{Finding, RuleError, RuleId, RuleRegistry};
use crate::suppress::filter_suppressed;

/// A rule failed while evaluating one document.
#[derive(Debug, Error)]
#[error("rule '{code}' failed")]
pub struct EvaluationError {
    pub code: RuleId,
    #[source]
    pub source: RuleError,
}

#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}")]
    Parse {
        file: String,
        #[source]
        source: ParseError,
    },

    #[error("rule '{code}' failed on {file}")]
    Rule {
        code: RuleId,
        file: String,
        #[source]
        source: RuleError,
    },
}

/// Run every enabled rule over one parsed document.
///
/// Findings come back ordered by statement start; findings on the same
/// statement keep registration order. The first rule error aborts.
pub fn evaluate(
    registry: &RuleRegistry,
    config: &Config,
    statements: &[Located<IrNode>],
) -> Result<Vec<Finding>, EvaluationError> {
    let ctx = config.lint_context();
    let mut findings = Vec::new();

    for rule in registry.iter() {
        if !config.is_enabled(rule.id()) {
            continue;
        }
        let found = rule
            .check(statements, &ctx)
            .map_err(|source| EvaluationError {
                code: rule.id(),
                source,
            })?;
        debug!(rule = %rule.id(), findings = found.len(), "rule evaluated");
        findings.extend(found);
    }

    // Stable: equal starts keep the registration order from above.
    findings.sort_by_key(|f| f.stmt_start);
    Ok(findings)
}

/// Lints files against one registry and configuration.
pub struct LintPipeline<'a> {
    registry: &'a RuleRegistry,
    config: &'a Config,
}

impl<'a> LintPipeline<'a> {
    pub fn new(registry: &'a RuleRegistry, config: &'a Config) -> Self {
        Self { registry, config }
    }

    /// Lint one document's source text. `file` is the name reported in
    /// violations and errors.
    pub fn lint_source(&self, file: &str, source: &str) -> Result<Vec<Violation>, LintError> {
        let statements = parse_sql(source).map_err(|e| LintError::Parse {
            file: file.to_string(),
            source: e,
        })?;
        debug!(file, statements = statements.len(), "parsed");

        let findings =
            evaluate(self.registry, self.config, &statements).map_err(|e| LintError::Rule {
                code: e.code,
                file: file.to_string(),
                source: e.source,
            })?;

        let raw = findings.len();
        let kept = filter_suppressed(source, findings);
        debug!(file, raw, suppressed = raw - kept.len(), "findings");

        Ok(kept
            .iter()
            .map(|f| Violation::new(file, source, f))
            .collect())
    }

    pub fn lint_file(&self, path: &Path) -> Result<Vec<Violation>, LintError> {
        let source = std::fs::read_to_string(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.lint_source(&path.display().to_string(), &source)
    }

    /// Lint `files` in order into one report. Nothing is returned unless
    /// every file succeeds.
    pub fn lint_files(&self, files: &[PathBuf]) -> Result<Report, LintError> {
        let mut report = Report::new();
        for path in files {
            report.extend(self.lint_file(path)?);
        }
        Ok(report)
    }
}
