//! rename-column: `ALTER TABLE ... RENAME COLUMN`
//!
//! Renaming is instant, but the old name disappears for every client at
//! once. There is no window where both names work.

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "Renaming a column is not backwards compatible and may break existing clients";

pub(super) const HELP: &str = "Add the new column as nullable and write to both from the application. \
     Perform a backfill. Update application code to only use the new column. Delete the old column";

pub(super) const EXPLAIN: &str = "rename-column: RENAME COLUMN\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... RENAME COLUMN ... TO ...\n\
         \n\
         Why it's dangerous:\n\
         Application instances deployed before the migration keep using the\n\
         old column name and fail as soon as the rename commits. Rolling\n\
         deployments always have such instances.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE users RENAME COLUMN email TO email_address;\n\
         \n\
         Fix (expand and contract):\n\
         1. Add the new column as nullable.\n\
         2. Write to both columns from the application.\n\
         3. Backfill the new column.\n\
         4. Switch reads to the new column.\n\
         5. Drop the old column in a later migration.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(statements
        .iter()
        .filter(|stmt| matches!(stmt.node, IrNode::RenameColumn { .. }))
        .map(|stmt| rule.make_finding(&stmt.span))
        .collect())
}
