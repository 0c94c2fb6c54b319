use crate::{RuleId, parser::SourceSpan};

/// A raw rule finding, before suppression directives are applied.
///
/// `stmt_start..stmt_end` is the byte range of the statement that triggered
/// the rule; the suppression filter and the report both work from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule_id: RuleId,
    pub slug: &'static str,
    pub help: &'static str,
    pub stmt_start: usize,
    pub stmt_end: usize,
}

impl Finding {
    /// Create a finding anchored at the given statement span.
    pub fn new(rule_id: RuleId, slug: &'static str, help: &'static str, span: &SourceSpan) -> Self {
        Self {
            rule_id,
            slug,
            help,
            stmt_start: span.start_offset,
            stmt_end: span.end_offset,
        }
    }
}
