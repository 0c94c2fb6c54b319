//! pgcheck: Linter for PostgreSQL migration scripts
//!
//! This library parses SQL migration files with PostgreSQL's own parser and
//! runs a fixed catalog of safety rules against each file: breaking changes,
//! excessive locking, non-idempotent DDL, nullability hazards and risky
//! types. Findings can be suppressed per statement with an inline comment.

pub mod config;
pub mod input;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod suppress;

// Re-export commonly used types
pub use config::Config;
pub use output::{Report, RuleInfo, Violation};
pub use parser::ir::{IrNode, Located};
pub use pipeline::LintPipeline;
pub use rules::{Finding, Rule, RuleId, RuleRegistry};
