//! missing-foreign-key-index: foreign key without a covering index
//!
//! PostgreSQL indexes the referenced side of a foreign key (it must be a key)
//! but never the referencing side. Without such an index, deletes and key
//! updates on the referenced table scan the referencing table once per row.

use crate::parser::ir::{AlterTableAction, IrNode, Located, SourceSpan, TableConstraint};
use crate::rules::{Finding, LintContext, Rule, RuleError};

pub(super) const SLUG: &str =
    "PostgreSQL does not create an automatic index for foreign key constraints.";

pub(super) const HELP: &str = "Add an index for the foreign key constraint column";

pub(super) const EXPLAIN: &str = "missing-foreign-key-index: foreign key without covering index\n\
         \n\
         What it detects:\n\
         A FOREIGN KEY (declared on a column or on the table in CREATE TABLE,\n\
         on a column added with ADD COLUMN, or with ADD CONSTRAINT) whose\n\
         referencing column does not appear in any later CREATE INDEX on the\n\
         same table in the same file. A foreign key is tracked by its table and\n\
         first referencing column; declaring it again on the same column\n\
         replaces the earlier declaration.\n\
         \n\
         Why it's dangerous:\n\
         When a row is deleted or its key updated in the referenced (parent)\n\
         table, PostgreSQL must find the rows that still reference it. With\n\
         no index on the referencing columns this is a sequential scan of the\n\
         child table for every affected parent row.\n\
         \n\
         Example (bad):\n\
           CREATE TABLE order_items (\n\
             id bigint PRIMARY KEY,\n\
             order_id bigint REFERENCES orders (id)\n\
           );\n\
         \n\
         Fix:\n\
           CREATE INDEX idx_order_items_order_id ON order_items (order_id);\n\
         \n\
         Any position counts: an index on (created_at, order_id) also clears\n\
         the foreign key on order_id.";

/// A foreign key seen so far that no index covers yet.
struct PendingFk<'a> {
    table: &'a str,
    column: &'a str,
    span: &'a SourceSpan,
}

pub(super) fn check(
    rule: impl Rule,
    statements: &[Located<IrNode>],
    _ctx: &LintContext,
) -> Result<Vec<Finding>, RuleError> {
    let mut pending: Vec<PendingFk<'_>> = Vec::new();

    for stmt in statements {
        match &stmt.node {
            IrNode::CreateTable(ct) => {
                for constraint in &ct.constraints {
                    collect_fk(&mut pending, ct.name.table_key(), constraint, &stmt.span)?;
                }
            }
            IrNode::AlterTable(at) => {
                for action in &at.actions {
                    match action {
                        AlterTableAction::AddConstraint(constraint) => {
                            collect_fk(&mut pending, at.name.table_key(), constraint, &stmt.span)?;
                        }
                        AlterTableAction::AddColumn {
                            inline_constraints, ..
                        } => {
                            for constraint in inline_constraints {
                                collect_fk(
                                    &mut pending,
                                    at.name.table_key(),
                                    constraint,
                                    &stmt.span,
                                )?;
                            }
                        }
                        _ => {}
                    }
                }
            }
            IrNode::CreateIndex(ci) => {
                let table = ci.table_name.table_key();
                pending.retain(|fk| {
                    !(fk.table == table
                        && ci.columns.iter().any(|c| c.column_name() == Some(fk.column)))
                });
            }
            _ => {}
        }
    }

    // A re-declared key moved to the end of `pending`; report in statement order.
    pending.sort_by_key(|fk| fk.span.start_offset);
    Ok(pending
        .iter()
        .map(|fk| rule.make_finding(fk.span))
        .collect())
}

fn collect_fk<'a>(
    pending: &mut Vec<PendingFk<'a>>,
    table: &'a str,
    constraint: &'a TableConstraint,
    span: &'a SourceSpan,
) -> Result<(), RuleError> {
    let TableConstraint::ForeignKey { columns, .. } = constraint else {
        return Ok(());
    };
    let Some(column) = columns.first() else {
        return Err(RuleError::MalformedStatement {
            offset: span.start_offset,
            reason: format!("foreign key on '{table}' lists no referencing columns"),
        });
    };
    pending.retain(|fk| !(fk.table == table && fk.column == column));
    pending.push(PendingFk {
        table,
        column,
        span,
    });
    Ok(())
}
