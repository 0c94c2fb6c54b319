//! drop-column: `ALTER TABLE ... DROP COLUMN`
//!
//! The DDL itself is cheap (PostgreSQL only marks the column as dropped), but
//! any client still reading or writing the column breaks as soon as the
//! migration is applied.

use crate::parser::ir::{AlterTableAction, IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError, alter_table_check};

pub(super) const SLUG: &str =
    "Dropping a column is not backwards compatible and may break existing clients";

pub(super) const HELP: &str =
    "Update the application code to no longer use the column before applying the change";

pub(super) const EXPLAIN: &str = "drop-column: DROP COLUMN\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... DROP COLUMN. One finding is reported per dropped\n\
         column.\n\
         \n\
         Why it's dangerous:\n\
         Application code deployed before the migration still references the\n\
         column. Once it is gone, those queries, ORM mappings and views fail\n\
         at runtime.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE orders DROP COLUMN legacy_status;\n\
         \n\
         Fix:\n\
         1. Remove every application reference to the column.\n\
         2. Deploy the application change.\n\
         3. Drop the column in a later migration.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(alter_table_check::check_alter_actions(
        statements,
        |_, action, stmt| {
            matches!(action, AlterTableAction::DropColumn { .. })
                .then(|| rule.make_finding(&stmt.span))
        },
    ))
}
