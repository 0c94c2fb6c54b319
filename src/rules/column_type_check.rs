//! Shared column type checking logic for rules that flag specific column types.
//!
//! Flags columns whose type matches a predicate across `CreateTable` and
//! `AddColumn`. One finding per matching column, anchored at its statement.

use crate::parser::ir::{AlterTableAction, IrNode, Located, TypeName};
use crate::rules::{Finding, Rule};

/// Check all column definitions in CREATE TABLE and ALTER TABLE ... ADD COLUMN
/// statements against a type predicate.
pub fn check_column_types(
    rule: &impl Rule,
    statements: &[Located<IrNode>],
    predicate: impl Fn(&TypeName) -> bool,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for stmt in statements {
        match &stmt.node {
            IrNode::CreateTable(ct) => {
                for col in &ct.columns {
                    if predicate(&col.type_name) {
                        findings.push(rule.make_finding(&stmt.span));
                    }
                }
            }
            IrNode::AlterTable(at) => {
                for action in &at.actions {
                    if let AlterTableAction::AddColumn { column, .. } = action
                        && predicate(&column.type_name)
                    {
                        findings.push(rule.make_finding(&stmt.span));
                    }
                }
            }
            _ => {}
        }
    }

    findings
}
