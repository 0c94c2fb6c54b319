//! Shared test helpers for rule unit tests.

use crate::parser::ir::*;
use crate::rules::LintContext;

/// A `LintContext` with an explicit implicit-transaction flag.
pub fn make_ctx(implicit_transaction: bool) -> LintContext {
    LintContext::new(implicit_transaction)
}

/// Wrap an `IrNode` in a `Located` with a dummy span at line 1.
pub fn located(node: IrNode) -> Located<IrNode> {
    located_at(node, 0, 0)
}

/// Wrap an `IrNode` in a `Located` covering `start..end`.
pub fn located_at(node: IrNode, start: usize, end: usize) -> Located<IrNode> {
    Located {
        node,
        span: SourceSpan {
            start_offset: start,
            end_offset: end,
        },
    }
}

/// Give each node a distinct, increasing span so findings can be told apart.
pub fn sequence(nodes: Vec<IrNode>) -> Vec<Located<IrNode>> {
    nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| located_at(node, i * 10, i * 10 + 9))
        .collect()
}

pub fn alter(table: &str, actions: Vec<AlterTableAction>) -> IrNode {
    IrNode::AlterTable(AlterTable {
        name: QualifiedName::unqualified(table),
        actions,
    })
}

pub fn column(name: &str, type_name: &str, nullable: bool, has_default: bool) -> ColumnDef {
    ColumnDef {
        name: name.to_string(),
        type_name: TypeName::simple(type_name),
        nullable,
        has_default,
    }
}

pub fn create_table(table: &str, columns: Vec<ColumnDef>, if_not_exists: bool) -> IrNode {
    IrNode::CreateTable(CreateTable {
        name: QualifiedName::unqualified(table),
        columns,
        constraints: vec![],
        if_not_exists,
    })
}

pub fn create_index(table: &str, columns: &[&str], concurrent: bool) -> IrNode {
    IrNode::CreateIndex(CreateIndex {
        index_name: Some(format!("idx_{table}_{}", columns.join("_"))),
        table_name: QualifiedName::unqualified(table),
        columns: columns
            .iter()
            .map(|c| IndexColumn::Column(c.to_string()))
            .collect(),
        concurrent,
        if_not_exists: false,
    })
}

pub fn foreign_key(columns: &[&str], not_valid: bool) -> TableConstraint {
    TableConstraint::ForeignKey {
        name: None,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        not_valid,
    }
}

pub fn begin() -> IrNode {
    IrNode::Transaction(TransactionControl::Begin)
}

pub fn commit() -> IrNode {
    IrNode::Transaction(TransactionControl::Commit)
}
