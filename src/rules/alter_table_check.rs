//! Shared helper for rules that inspect individual ALTER TABLE actions.
//!
//! Used by drop-column, change-column-type, add-non-null-column,
//! set-non-null-column and constraint-excessive-lock, which all follow the same
//! pattern: iterate statements, filter to `AlterTable`, then check each action.

use crate::parser::ir::{AlterTable, AlterTableAction, IrNode, Located};
use crate::rules::Finding;

/// Iterate ALTER TABLE statements and call `check_action` for each action.
/// Returns all findings collected from the callback, in statement order.
///
/// The callback receives:
/// - `at`: the AlterTable node (for accessing table name, etc.)
/// - `action`: a single action within the ALTER TABLE
/// - `stmt`: the Located wrapper (for source span)
///
/// Return `Some(finding)` to emit a finding for the action.
pub fn check_alter_actions<F>(statements: &[Located<IrNode>], mut check_action: F) -> Vec<Finding>
where
    F: FnMut(&AlterTable, &AlterTableAction, &Located<IrNode>) -> Option<Finding>,
{
    let mut findings = Vec::new();
    for stmt in statements {
        if let IrNode::AlterTable(ref at) = stmt.node {
            for action in &at.actions {
                findings.extend(check_action(at, action, stmt));
            }
        }
    }
    findings
}
