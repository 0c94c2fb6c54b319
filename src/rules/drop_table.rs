//! drop-table: `DROP TABLE`

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "Dropping a table is not backwards compatible and may break existing clients";

pub(super) const HELP: &str =
    "Update the application code to no longer use the table before applying the change";

pub(super) const EXPLAIN: &str = "drop-table: DROP TABLE\n\
         \n\
         What it detects:\n\
         Any DROP TABLE statement, with or without IF EXISTS. A statement\n\
         dropping several tables is reported once.\n\
         \n\
         Why it's dangerous:\n\
         Running application instances still query the table. Dropping it\n\
         turns every such query into an error, and the data is gone.\n\
         \n\
         Example (bad):\n\
           DROP TABLE order_audit;\n\
         \n\
         Fix:\n\
         Stop reading and writing the table from the application first,\n\
         deploy that change, then drop the table in a later migration.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(statements
        .iter()
        .filter(|stmt| matches!(stmt.node, IrNode::DropTable(_)))
        .map(|stmt| rule.make_finding(&stmt.span))
        .collect())
}
