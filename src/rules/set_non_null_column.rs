//! set-non-null-column: `ALTER COLUMN ... SET NOT NULL`

use crate::parser::ir::{AlterTableAction, IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError, alter_table_check};

pub(super) const SLUG: &str =
    "Altering a column to be non-nullable might fail if the column contains null values";

pub(super) const HELP: &str = "Ensure that the column does not contain any null values";

pub(super) const EXPLAIN: &str = "set-non-null-column: SET NOT NULL\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... ALTER COLUMN ... SET NOT NULL.\n\
         \n\
         Why it's dangerous:\n\
         PostgreSQL scans the whole table under an ACCESS EXCLUSIVE lock to\n\
         verify that no row holds NULL, and the statement fails if one does.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE orders ALTER COLUMN status SET NOT NULL;\n\
         \n\
         Fix:\n\
         Backfill the column first. On PostgreSQL 12+ add a\n\
         CHECK (status IS NOT NULL) NOT VALID constraint, validate it in a\n\
         separate transaction, then SET NOT NULL (which reuses the validated\n\
         constraint and skips the scan).";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(alter_table_check::check_alter_actions(
        statements,
        |_, action, stmt| {
            matches!(action, AlterTableAction::SetNotNull { .. })
                .then(|| rule.make_finding(&stmt.span))
        },
    ))
}
