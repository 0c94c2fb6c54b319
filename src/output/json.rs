//! JSON output
//!
//! A pretty-printed array of violation records, one object per violation:
//! `{file, code, statement, statementLine, slug, help}`.

use crate::output::{Report, ReportError, Reporter, RuleInfo};

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut json = serde_json::to_string_pretty(report)?;
        json.push('\n');
        Ok(json)
    }

    fn render_rules(&self, rules: &[RuleInfo]) -> Result<String, ReportError> {
        let mut json = serde_json::to_string_pretty(rules)?;
        json.push('\n');
        Ok(json)
    }
}
