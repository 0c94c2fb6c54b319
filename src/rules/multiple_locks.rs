//! multiple-locks: one transaction altering more than one table
//!
//! Experimental and disabled by default. Every `ALTER TABLE` takes a strong
//! lock that is held until the transaction ends; taking locks on several
//! tables in one transaction invites lock-order deadlocks with application
//! traffic.

use crate::parser::ir::{IrNode, Located};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "Experimental: acquiring multiple locks in a single transaction can cause a deadlock.";

pub(super) const HELP: &str = "Perform the changes in separate transactions";

pub(super) const EXPLAIN: &str = "multiple-locks: several tables altered in one transaction\n\
         \n\
         What it detects:\n\
         An ALTER TABLE that makes the current transaction hold locks on a\n\
         second (third, ...) distinct table. Each such statement is reported.\n\
         Without explicit BEGIN/COMMIT the whole file counts as one\n\
         transaction unless implicitTransaction is set to false.\n\
         \n\
         Why it's dangerous:\n\
         ALTER TABLE locks are held until COMMIT. When the migration locks\n\
         table A then B while application transactions lock B then A, the\n\
         two deadlock and one of them is aborted.\n\
         \n\
         Example (bad):\n\
           BEGIN;\n\
           ALTER TABLE orders ADD COLUMN note text;\n\
           ALTER TABLE customers ADD COLUMN note text;\n\
           COMMIT;\n\
         \n\
         Fix:\n\
         Alter each table in its own transaction.\n\
         \n\
         This rule is experimental and disabled by default. Enable it with\n\
         rules: { multiple-locks: { enabled: true } } in the config file.";

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    let mut tracker = ctx.tx_tracker();
    let mut findings = Vec::new();

    for stmt in statements {
        if let IrNode::AlterTable(at) = &stmt.node
            && tracker.touch(at.name.table_key()) > 1
        {
            findings.push(rule.make_finding(&stmt.span));
        }
        tracker.advance(&stmt.node);
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleId;
    use crate::parser::ir::AlterTableAction;
    use crate::rules::test_helpers::*;

    fn touch(table: &str) -> IrNode {
        alter(
            table,
            vec![AlterTableAction::DropColumn {
                name: "x".to_string(),
            }],
        )
    }

    fn starts(findings: &[Finding]) -> Vec<usize> {
        findings.iter().map(|f| f.stmt_start).collect()
    }

    #[test]
    fn test_second_table_in_transaction_fires() {
        let stmts = sequence(vec![begin(), touch("a"), touch("b"), commit()]);

        let findings = RuleId::MultipleLocks.check(&stmts, &make_ctx(false)).unwrap();
        assert_eq!(starts(&findings), vec![20]);
    }

    #[test]
    fn test_same_table_twice_no_finding() {
        let stmts = sequence(vec![begin(), touch("a"), touch("a"), commit()]);

        let findings = RuleId::MultipleLocks.check(&stmts, &make_ctx(false)).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_separate_transactions_no_finding() {
        let stmts = sequence(vec![
            begin(),
            touch("a"),
            commit(),
            begin(),
            touch("b"),
            commit(),
        ]);

        let findings = RuleId::MultipleLocks.check(&stmts, &make_ctx(false)).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_implicit_transaction_covers_whole_file() {
        let stmts = sequence(vec![touch("a"), touch("b"), touch("c")]);

        let findings = RuleId::MultipleLocks.check(&stmts, &make_ctx(true)).unwrap();
        assert_eq!(starts(&findings), vec![10, 20]);
    }

    #[test]
    fn test_outside_transaction_no_finding() {
        let stmts = sequence(vec![touch("a"), touch("b")]);

        let findings = RuleId::MultipleLocks.check(&stmts, &make_ctx(false)).unwrap();
        assert!(findings.is_empty());
    }
}
