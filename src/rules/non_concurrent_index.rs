//! non-concurrent-index: `CREATE INDEX` / `DROP INDEX` without `CONCURRENTLY`
//!
//! A plain index build takes a SHARE lock on the table (blocking writes) and
//! a plain index drop takes ACCESS EXCLUSIVE (blocking everything) for the
//! duration of the operation.

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str = "Creating/dropping an index non-concurrently acquires a lock on the table \
     that block writes for the duration of the operation";

pub(super) const HELP: &str = "Create/drop the index concurrently using the `CONCURRENTLY` option to avoid \
     blocking. Note: this cannot be done inside a transaction";

pub(super) const EXPLAIN: &str = "non-concurrent-index: index operation without CONCURRENTLY\n\
         \n\
         What it detects:\n\
         CREATE INDEX or DROP INDEX without the CONCURRENTLY option.\n\
         \n\
         Why it's dangerous:\n\
         CREATE INDEX holds a SHARE lock that blocks INSERT, UPDATE and\n\
         DELETE until the whole index is built, which can take minutes on a\n\
         large table. DROP INDEX holds an ACCESS EXCLUSIVE lock that blocks\n\
         reads as well.\n\
         \n\
         Example (bad):\n\
           CREATE INDEX idx_orders_customer ON orders (customer_id);\n\
         \n\
         Fix:\n\
           CREATE INDEX CONCURRENTLY idx_orders_customer ON orders (customer_id);\n\
         \n\
         CONCURRENTLY cannot run inside a transaction block; see\n\
         concurrent-in-tx.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(statements
        .iter()
        .filter(|stmt| match &stmt.node {
            IrNode::CreateIndex(ci) => !ci.concurrent,
            IrNode::DropIndex(di) => !di.concurrent,
            _ => false,
        })
        .map(|stmt| rule.make_finding(&stmt.span))
        .collect())
}
