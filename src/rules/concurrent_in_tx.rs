//! concurrent-in-tx: `CONCURRENTLY` index operation inside a transaction
//!
//! PostgreSQL refuses to run `CREATE INDEX CONCURRENTLY` or
//! `DROP INDEX CONCURRENTLY` inside a transaction block.

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "Concurrently creating/dropping an index cannot be done inside of a transaction";

pub(super) const HELP: &str = "Perform the operation outside of a transaction";

pub(super) const EXPLAIN: &str = "concurrent-in-tx: CONCURRENTLY inside a transaction\n\
         \n\
         What it detects:\n\
         CREATE INDEX CONCURRENTLY or DROP INDEX CONCURRENTLY issued while a\n\
         transaction is open: after BEGIN and before COMMIT/ROLLBACK, or\n\
         anywhere in the file when the migration tool wraps files in an\n\
         implicit transaction (implicitTransaction: true, the default).\n\
         \n\
         Why it's a problem:\n\
         The statement fails with 'cannot run inside a transaction block'\n\
         and the migration aborts.\n\
         \n\
         Example (bad):\n\
           BEGIN;\n\
           CREATE INDEX CONCURRENTLY idx_orders_status ON orders (status);\n\
           COMMIT;\n\
         \n\
         Fix:\n\
         Move the statement out of the transaction. With an implicit\n\
         transaction, put it in its own migration file and configure the\n\
         migration tool to run that file without a transaction.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    let mut tracker = ctx.tx_tracker();
    let mut findings = Vec::new();

    for stmt in statements {
        tracker.advance(&stmt.node);
        if !tracker.in_transaction() {
            continue;
        }
        let concurrent = match &stmt.node {
            IrNode::CreateIndex(ci) => ci.concurrent,
            IrNode::DropIndex(di) => di.concurrent,
            _ => false,
        };
        if concurrent {
            findings.push(rule.make_finding(&stmt.span));
        }
    }

    Ok(findings)
}
