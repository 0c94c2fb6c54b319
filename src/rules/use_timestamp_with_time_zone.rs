//! use-timestamp-with-time-zone: `timestamp` without time zone
//!
//! `timestamp` stores wall-clock time without an offset, so values written
//! from sessions in different time zones silently disagree.

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError, column_type_check};

pub(super) const SLUG: &str = "Timestamp with time zone preserves the time zone information and makes \
     the data easier to reason about";

pub(super) const HELP: &str = "Update fields to use `timestamptz`/`timestamp with time zone` instead of \
     `timestamp`/`timestamp without time zone`";

pub(super) const EXPLAIN: &str = "use-timestamp-with-time-zone: timestamp without time zone\n\
         \n\
         What it detects:\n\
         Columns of type timestamp (timestamp without time zone) declared in\n\
         CREATE TABLE or ALTER TABLE ... ADD COLUMN. One finding is reported\n\
         per column.\n\
         \n\
         Why it matters:\n\
         timestamp drops the offset the value was written with. Two clients\n\
         in different time zones writing 'now' store different instants that\n\
         look alike, and arithmetic across DST changes goes wrong.\n\
         timestamptz stores an absolute instant and converts on output.\n\
         \n\
         Example (bad):\n\
           CREATE TABLE events (created_at timestamp NOT NULL);\n\
         \n\
         Fix:\n\
           CREATE TABLE events (created_at timestamptz NOT NULL);";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(column_type_check::check_column_types(
        &rule,
        statements,
        |ty| ty.is_timestamp_without_time_zone(),
    ))
}
