//! constraint-excessive-lock: `ADD CONSTRAINT` without `NOT VALID`
//!
//! Adding a validated foreign key or check constraint scans the whole table
//! while holding a lock that blocks writes.

use crate::parser::ir::{AlterTableAction, IrNode, Located, TableConstraint};
use crate::rules::{Finding, LintContext, Rule, RuleError, alter_table_check};

pub(super) const SLUG: &str =
    "Adding a constraint acquires a lock blocking any writes during the constraint validation";

pub(super) const HELP: &str = "Append the `NOT VALID` option and then in a following transaction perform \
     `ALTER TABLE VALIDATE CONSTRAINT ...`";

pub(super) const EXPLAIN: &str = "constraint-excessive-lock: ADD CONSTRAINT without NOT VALID\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... ADD CONSTRAINT of a FOREIGN KEY or CHECK constraint\n\
         without NOT VALID. Constraints declared inside CREATE TABLE are not\n\
         affected since the table is empty.\n\
         \n\
         Why it's dangerous:\n\
         PostgreSQL validates every existing row while holding a lock that\n\
         blocks writes to the table (and, for a foreign key, to the\n\
         referenced table). On a large table this is a long outage.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE orders ADD CONSTRAINT orders_customer_fk\n\
             FOREIGN KEY (customer_id) REFERENCES customers (id);\n\
         \n\
         Fix:\n\
           ALTER TABLE orders ADD CONSTRAINT orders_customer_fk\n\
             FOREIGN KEY (customer_id) REFERENCES customers (id) NOT VALID;\n\
           -- in a following transaction:\n\
           ALTER TABLE orders VALIDATE CONSTRAINT orders_customer_fk;\n\
         \n\
         VALIDATE CONSTRAINT only takes a SHARE UPDATE EXCLUSIVE lock, so\n\
         reads and writes continue while it runs.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(alter_table_check::check_alter_actions(
        statements,
        |_, action, stmt| match action {
            AlterTableAction::AddConstraint(
                TableConstraint::ForeignKey { not_valid, .. }
                | TableConstraint::Check { not_valid, .. },
            ) if !not_valid => Some(rule.make_finding(&stmt.span)),
            _ => None,
        },
    ))
}
