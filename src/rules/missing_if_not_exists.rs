//! missing-if-not-exists: non-idempotent `CREATE TABLE` / `CREATE INDEX`

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "Creating an object might fail if it already exists, making the migration non idempotent";

pub(super) const HELP: &str =
    "Wrap the create statements with guards; e.g. CREATE TABLE IF NOT EXISTS pgcheck ...";

pub(super) const EXPLAIN: &str = "missing-if-not-exists: CREATE without IF NOT EXISTS\n\
         \n\
         What it detects:\n\
         CREATE TABLE without IF NOT EXISTS, and CREATE INDEX with an\n\
         explicit name but without IF NOT EXISTS. Unnamed indexes get a\n\
         fresh generated name on every run and are not reported.\n\
         \n\
         Why it matters:\n\
         A migration that is re-run after a partial failure, or applied to\n\
         an environment where the object was created by hand, fails with\n\
         'relation already exists' instead of converging.\n\
         \n\
         Example (bad):\n\
           CREATE TABLE orders (id bigint PRIMARY KEY);\n\
         \n\
         Fix:\n\
           CREATE TABLE IF NOT EXISTS orders (id bigint PRIMARY KEY);";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(statements
        .iter()
        .filter(|stmt| match &stmt.node {
            IrNode::CreateTable(ct) => !ct.if_not_exists,
            IrNode::CreateIndex(ci) => !ci.if_not_exists && ci.index_name.is_some(),
            _ => false,
        })
        .map(|stmt| rule.make_finding(&stmt.span))
        .collect())
}
