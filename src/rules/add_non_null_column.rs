//! add-non-null-column: `ADD COLUMN ... NOT NULL` without a `DEFAULT`
//!
//! On a populated table PostgreSQL cannot fill the new column, so the
//! statement fails. A `PRIMARY KEY` column is implicitly `NOT NULL`.

use crate::parser::ir::{AlterTableAction, IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError, alter_table_check};

pub(super) const SLUG: &str =
    "Adding a non-nullable column without a default will fail if the table is populated";

pub(super) const HELP: &str = "Make the column nullable or add a default";

pub(super) const EXPLAIN: &str = "add-non-null-column: ADD COLUMN NOT NULL without DEFAULT\n\
         \n\
         What it detects:\n\
         ALTER TABLE ... ADD COLUMN where the new column is NOT NULL (or a\n\
         PRIMARY KEY) and has no DEFAULT.\n\
         \n\
         Why it's dangerous:\n\
         Existing rows would get NULL in the new column, which the constraint\n\
         forbids. The migration works against an empty development database\n\
         and fails in production.\n\
         \n\
         Example (bad):\n\
           ALTER TABLE orders ADD COLUMN status text NOT NULL;\n\
         \n\
         Fix:\n\
           ALTER TABLE orders ADD COLUMN status text NOT NULL DEFAULT 'pending';\n\
         or add the column as nullable, backfill it, then SET NOT NULL.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    Ok(alter_table_check::check_alter_actions(
        statements,
        |_, action, stmt| match action {
            AlterTableAction::AddColumn { column, .. }
                if !column.nullable && !column.has_default =>
            {
                Some(rule.make_finding(&stmt.span))
            }
            _ => None,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleId;
    use crate::parser::ir::ColumnDef;
    use crate::rules::test_helpers::*;

    fn add(column: ColumnDef) -> AlterTableAction {
        AlterTableAction::AddColumn {
            column,
            inline_constraints: vec![],
        }
    }

    fn run(column: ColumnDef) -> Vec<Finding> {
        let stmts = vec![located(alter("orders", vec![add(column)]))];
        RuleId::AddNonNullColumn
            .check(&stmts, &make_ctx(true))
            .unwrap()
    }

    #[test]
    fn test_not_null_without_default_fires() {
        let findings = run(column("status", "text", false, false));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, RuleId::AddNonNullColumn);
    }

    #[test]
    fn test_not_null_with_default_no_finding() {
        assert!(run(column("status", "text", false, true)).is_empty());
    }

    #[test]
    fn test_nullable_no_finding() {
        assert!(run(column("status", "text", true, false)).is_empty());
    }

    #[test]
    fn test_create_table_not_null_no_finding() {
        let stmts = vec![located(create_table(
            "orders",
            vec![column("status", "text", false, false)],
            true,
        ))];
        let findings = RuleId::AddNonNullColumn
            .check(&stmts, &make_ctx(true))
            .unwrap();
        assert!(findings.is_empty());
    }
}
