//! Human-readable text output
//!
//! One block per violation, followed by a one-line summary:
//! ```text
//! drop-column: migrations/001.sql:3
//!
//!   3 | ALTER TABLE t DROP COLUMN v
//!
//!   Violation: Dropping a column is not backwards compatible ...
//!   Solution: ...
//!   Explanation: run `pgcheck explain drop-column`
//! ........
//!
//! 1 violation(s) found in 1 file(s)
//! ```

use colored::Colorize;

use crate::output::{Report, ReportError, Reporter, RuleInfo, Violation};

const RULER_WIDTH: usize = 120;

/// Text reporter. Colors only when `colored` is set.
pub struct TextReporter {
    pub colored: bool,
}

impl TextReporter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn red(&self, s: &str) -> String {
        if self.colored {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }

    fn green(&self, s: &str) -> String {
        if self.colored {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        if self.colored {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn magenta(&self, s: &str) -> String {
        if self.colored {
            s.magenta().to_string()
        } else {
            s.to_string()
        }
    }

    fn format_violation(&self, v: &Violation) -> String {
        let excerpt: String = v
            .statement
            .replace("\r\n", "\n")
            .split('\n')
            .enumerate()
            .map(|(i, line)| format!("  {} | {}\n", v.statement_line + i, line))
            .collect();

        format!(
            "{}: {}:{}\n\n{excerpt}\n  {}: {}\n  {}: {}\n  {}: run `pgcheck explain {}`\n{}\n",
            self.red(v.code.as_str()),
            v.file,
            v.statement_line,
            self.bold("Violation"),
            v.slug,
            self.bold("Solution"),
            v.help,
            self.bold("Explanation"),
            v.code,
            ".".repeat(RULER_WIDTH),
        )
    }
}

impl Reporter for TextReporter {
    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut output = String::new();
        for v in report.iter() {
            output.push_str(&self.format_violation(v));
            output.push('\n');
        }

        if report.is_empty() {
            output.push_str(&self.green("0 violations found"));
        } else {
            output.push_str(&self.red(&format!(
                "{} violation(s) found in {} file(s)",
                report.len(),
                report.file_count()
            )));
        }
        output.push('\n');
        Ok(output)
    }

    fn render_rules(&self, rules: &[RuleInfo]) -> Result<String, ReportError> {
        Ok(rules
            .iter()
            .map(|rule| {
                format!(
                    "{}\n\t| {}\n\tHelp: {}\n\tEnabled by default: {}\n\tExplanation: run `pgcheck explain {}`\n\tCategory: {}\n\n",
                    self.magenta(rule.code.as_str()),
                    rule.slug,
                    rule.help,
                    rule.enabled_by_default,
                    rule.code,
                    rule.category,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Category, RuleId};

    fn violation(file: &str, code: RuleId, statement: &str, line: usize) -> Violation {
        Violation {
            file: file.to_string(),
            code,
            statement: statement.to_string(),
            statement_line: line,
            slug: "Problem".to_string(),
            help: "Fix it".to_string(),
        }
    }

    #[test]
    fn test_empty_report() {
        let out = TextReporter::new(false).render(&Report::new()).unwrap();
        assert_eq!(out, "0 violations found\n");
    }

    #[test]
    fn test_single_violation_layout() {
        let mut report = Report::new();
        report.push(violation(
            "m.sql",
            RuleId::DropColumn,
            "ALTER TABLE t\n  DROP COLUMN v",
            3,
        ));

        let out = TextReporter::new(false).render(&report).unwrap();
        let expected = format!(
            "drop-column: m.sql:3\n\
             \n\
             \x20 3 | ALTER TABLE t\n\
             \x20 4 |   DROP COLUMN v\n\
             \n\
             \x20 Violation: Problem\n\
             \x20 Solution: Fix it\n\
             \x20 Explanation: run `pgcheck explain drop-column`\n\
             {}\n\
             \n\
             1 violation(s) found in 1 file(s)\n",
            ".".repeat(120)
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_summary_counts_files() {
        let mut report = Report::new();
        report.push(violation("a.sql", RuleId::DropTable, "DROP TABLE a", 1));
        report.push(violation("a.sql", RuleId::DropTable, "DROP TABLE b", 2));
        report.push(violation("b.sql", RuleId::DropTable, "DROP TABLE c", 1));

        let out = TextReporter::new(false).render(&report).unwrap();
        assert!(out.ends_with("3 violation(s) found in 2 file(s)\n"));
        assert_eq!(out.matches("drop-table: ").count(), 3);
    }

    #[test]
    fn test_uncolored_has_no_escape_codes() {
        let mut report = Report::new();
        report.push(violation("a.sql", RuleId::DropTable, "DROP TABLE a", 1));
        let out = TextReporter::new(false).render(&report).unwrap();
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_rules_listing() {
        let rules = vec![RuleInfo {
            code: RuleId::MultipleLocks,
            slug: "Slug",
            help: "Help text",
            category: Category::Locking,
            enabled_by_default: false,
        }];

        let out = TextReporter::new(false).render_rules(&rules).unwrap();
        assert_eq!(
            out,
            "multiple-locks\n\
             \t| Slug\n\
             \tHelp: Help text\n\
             \tEnabled by default: false\n\
             \tExplanation: run `pgcheck explain multiple-locks`\n\
             \tCategory: locking\n\n"
        );
    }
}
