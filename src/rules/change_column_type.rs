//! change-column-type: `ALTER TABLE ... ALTER COLUMN ... TYPE`

use crate::parser::ir::{AlterTableAction, IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError, alter_table_check};

pub(super) const SLUG: &str =
    "Changing the type of a column is not backwards compatible and may break existing clients";

pub(super) const HELP: &str = "Add a new column with the new type and write to both from the application. \
     Perform a backfill. Update application code to only use the new column. Delete the old column";

pub(super) const EXPLAIN: &str = "change-column-type: ALTER COLUMN ... TYPE\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... ALTER COLUMN ... TYPE (or SET DATA TYPE). One\n\
         finding is reported per altered column.\n\
         \n\
         Why it's dangerous:\n\
         Most type changes rewrite the whole table under an ACCESS EXCLUSIVE\n\
         lock, blocking reads and writes for the duration. Clients that\n\
         expect the old type may also break once the change lands.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE orders ALTER COLUMN amount TYPE numeric(12,2);\n\
         \n\
         Fix:\n\
         Add a new column with the new type, write to both from the\n\
         application, backfill, move reads over, then drop the old column.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(alter_table_check::check_alter_actions(
        statements,
        |_, action, stmt| {
            matches!(action, AlterTableAction::AlterColumnType { .. })
                .then(|| rule.make_finding(&stmt.span))
        },
    ))
}
