//! pg_query AST to IR conversion
//!
//! This module converts the pg_query crate's PostgreSQL AST into the simplified
//! IR layer used by the rule engine. It handles type canonicalization, constraint
//! normalization, and source location tracking.

use crate::parser::ir::{
    AlterTable, AlterTableAction, ColumnDef, CreateIndex, CreateTable, DropIndex, DropTable,
    IndexColumn, IrNode, Located, QualifiedName, SourceSpan, TableConstraint, TransactionControl,
    TypeName,
};
use pg_query::NodeEnum;
use pg_query::protobuf::{AlterTableType, ConstrType, ObjectType, TransactionStmtKind};
use thiserror::Error;

/// Sentinel type name used when the actual type cannot be determined.
const UNKNOWN_TYPE: &str = "unknown";


/// The source is not valid PostgreSQL. Carries the parser's diagnostic.
#[derive(Debug, Clone, Error)]
#[error("Failed to parse SQL: {message}")]
pub struct ParseError {
    pub message: String,
}

/// Parse a SQL source string into a list of located IR nodes, one per
/// top-level statement, in source order.
///
/// Statements that parse but have no IR mapping (e.g., GRANT, COMMENT ON) are
/// returned as `Ignored`. A syntax error anywhere in the source fails the
/// whole parse.
///
/// Line numbers in the returned `SourceSpan`s are 1-based.
pub fn parse_sql(source: &str) -> Result<Vec<Located<IrNode>>, ParseError> {
    let result = pg_query::parse(source).map_err(|e| ParseError {
        message: e.to_string(),
    })?;

    let mut nodes = Vec::with_capacity(result.protobuf.stmts.len());

    for raw_stmt in &result.protobuf.stmts {
        let start_offset = (raw_stmt.stmt_location.max(0) as usize).min(source.len());
        // stmt_len == 0 means "the rest of the string" (last statement without `;`).
        let end_offset = if raw_stmt.stmt_len > 0 {
            (start_offset + raw_stmt.stmt_len as usize).min(source.len())
        } else {
            source.len()
        };
        let raw_sql = source.get(start_offset..end_offset).unwrap_or("");

        let node = match raw_stmt.stmt.as_ref().and_then(|s| s.node.as_ref()) {
            Some(node_enum) => convert_node(node_enum, raw_sql),
            None => IrNode::Ignored {
                raw_sql: raw_sql.trim().to_string(),
            },
        };

        nodes.push(Located {
            node,
            span: SourceSpan {
                start_offset,
                end_offset,
            },
        });
    }

    Ok(nodes)
}

/// Convert a pg_query `NodeEnum` into an IR node.
fn convert_node(node: &NodeEnum, raw_sql: &str) -> IrNode {
    match node {
        NodeEnum::CreateStmt(create) => convert_create_table(create),
        NodeEnum::AlterTableStmt(alter) if alter.objtype() == ObjectType::ObjectTable => {
            convert_alter_table(alter, raw_sql)
        }
        NodeEnum::IndexStmt(idx) => convert_create_index(idx),
        NodeEnum::DropStmt(drop) => convert_drop_stmt(drop, raw_sql),
        NodeEnum::RenameStmt(rename) => convert_rename_stmt(rename, raw_sql),
        NodeEnum::TransactionStmt(tx) => convert_transaction_stmt(tx, raw_sql),
        _ => ignored(raw_sql),
    }
}

fn ignored(raw_sql: &str) -> IrNode {
    IrNode::Ignored {
        raw_sql: raw_sql.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// CREATE TABLE
// ---------------------------------------------------------------------------

/// Convert a pg_query `CreateStmt` to `IrNode::CreateTable`.
fn convert_create_table(create: &pg_query::protobuf::CreateStmt) -> IrNode {
    let name = relation_to_qualified_name(create.relation.as_ref());

    let mut columns = Vec::new();
    let mut constraints = Vec::new();

    for elt in &create.table_elts {
        match elt.node.as_ref() {
            Some(NodeEnum::ColumnDef(col)) => {
                let (col_def, inline_constraints) = convert_column_def(col);
                columns.push(col_def);
                constraints.extend(inline_constraints);
            }
            Some(NodeEnum::Constraint(con)) => {
                if let Some(tc) = convert_table_constraint(con, None) {
                    constraints.push(tc);
                }
            }
            _ => {}
        }
    }

    IrNode::CreateTable(CreateTable {
        name,
        columns,
        constraints,
        if_not_exists: create.if_not_exists,
    })
}

/// Convert a constraint name to `Option<String>`, treating empty strings as `None`.
fn optional_name(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Convert a pg_query `ColumnDef` into an IR `ColumnDef` plus any inline
/// key/reference/check constraints declared on it.
fn convert_column_def(col: &pg_query::protobuf::ColumnDef) -> (ColumnDef, Vec<TableConstraint>) {
    let type_name = extract_type_name(col.type_name.as_ref());

    let mut nullable = true;
    let mut has_default = false;
    let mut constraints = Vec::new();

    for con_node in &col.constraints {
        let Some(NodeEnum::Constraint(con)) = con_node.node.as_ref() else {
            continue;
        };

        match con.contype() {
            ConstrType::ConstrNotnull => nullable = false,
            ConstrType::ConstrDefault => has_default = true,
            ConstrType::ConstrPrimary => {
                nullable = false;
                constraints.extend(convert_table_constraint(con, Some(&col.colname)));
            }
            ConstrType::ConstrForeign | ConstrType::ConstrUnique | ConstrType::ConstrCheck => {
                constraints.extend(convert_table_constraint(con, Some(&col.colname)));
            }
            _ => {}
        }
    }

    let col_def = ColumnDef {
        name: col.colname.clone(),
        type_name,
        nullable,
        has_default,
    };

    (col_def, constraints)
}

// ---------------------------------------------------------------------------
// Type name extraction
// ---------------------------------------------------------------------------

/// Extract a canonical `TypeName` from a pg_query `TypeName` node.
///
/// Canonical name extraction: use the LAST element of `TypeName.names[]`.
/// `timestamp` arrives as `["pg_catalog", "timestamp"]`, `timestamptz` and
/// `timestamp with time zone` both end in `"timestamptz"`.
fn extract_type_name(tn: Option<&pg_query::protobuf::TypeName>) -> TypeName {
    let Some(tn) = tn else {
        return TypeName::simple(UNKNOWN_TYPE);
    };

    let canonical = tn
        .names
        .iter()
        .rev()
        .find_map(|n| match n.node.as_ref() {
            Some(NodeEnum::String(s)) => Some(s.sval.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

    TypeName::simple(canonical)
}

// ---------------------------------------------------------------------------
// ALTER TABLE
// ---------------------------------------------------------------------------

/// Convert a pg_query `AlterTableStmt` to `IrNode::AlterTable`.
fn convert_alter_table(alter: &pg_query::protobuf::AlterTableStmt, raw_sql: &str) -> IrNode {
    let name = relation_to_qualified_name(alter.relation.as_ref());

    let actions: Vec<AlterTableAction> = alter
        .cmds
        .iter()
        .filter_map(|cmd_node| match cmd_node.node.as_ref() {
            Some(NodeEnum::AlterTableCmd(cmd)) => Some(convert_alter_table_cmd(cmd)),
            _ => None,
        })
        .collect();

    if actions.is_empty() {
        return ignored(raw_sql);
    }

    IrNode::AlterTable(AlterTable { name, actions })
}

/// Convert a single `AlterTableCmd` into an `AlterTableAction`.
fn convert_alter_table_cmd(cmd: &pg_query::protobuf::AlterTableCmd) -> AlterTableAction {
    let def = cmd.def.as_ref().and_then(|d| d.node.as_ref());

    match cmd.subtype() {
        AlterTableType::AtAddColumn => match def {
            Some(NodeEnum::ColumnDef(col)) => {
                let (column, inline_constraints) = convert_column_def(col);
                AlterTableAction::AddColumn {
                    column,
                    inline_constraints,
                }
            }
            _ => AlterTableAction::Other {
                description: "ADD COLUMN (unparseable definition)".to_string(),
            },
        },
        AlterTableType::AtDropColumn => AlterTableAction::DropColumn {
            name: cmd.name.clone(),
        },
        AlterTableType::AtAddConstraint => match def {
            Some(NodeEnum::Constraint(con)) => match convert_table_constraint(con, None) {
                Some(tc) => AlterTableAction::AddConstraint(tc),
                None => AlterTableAction::Other {
                    description: "ADD CONSTRAINT (unknown type)".to_string(),
                },
            },
            _ => AlterTableAction::Other {
                description: "ADD CONSTRAINT (unparseable)".to_string(),
            },
        },
        AlterTableType::AtAlterColumnType => {
            // The new type is in cmd.def as a ColumnDef with the type_name
            let new_type = match def {
                Some(NodeEnum::ColumnDef(col)) => extract_type_name(col.type_name.as_ref()),
                _ => TypeName::simple(UNKNOWN_TYPE),
            };
            AlterTableAction::AlterColumnType {
                column_name: cmd.name.clone(),
                new_type,
            }
        }
        AlterTableType::AtSetNotNull => AlterTableAction::SetNotNull {
            column_name: cmd.name.clone(),
        },
        other => AlterTableAction::Other {
            description: format!("{:?}", other),
        },
    }
}

// ---------------------------------------------------------------------------
// RENAME COLUMN
// ---------------------------------------------------------------------------

/// `ALTER TABLE ... RENAME COLUMN` becomes `IrNode::RenameColumn`; every other
/// rename is ignored.
fn convert_rename_stmt(rename: &pg_query::protobuf::RenameStmt, raw_sql: &str) -> IrNode {
    match rename.rename_type() {
        ObjectType::ObjectColumn => IrNode::RenameColumn {
            table: relation_to_qualified_name(rename.relation.as_ref()),
            old_name: rename.subname.clone(),
            new_name: rename.newname.clone(),
        },
        _ => ignored(raw_sql),
    }
}

// ---------------------------------------------------------------------------
// Transaction control
// ---------------------------------------------------------------------------

/// `END` is parsed as `COMMIT` and `ABORT` as `ROLLBACK` by PostgreSQL.
/// Savepoints and two-phase commit are ignored.
fn convert_transaction_stmt(tx: &pg_query::protobuf::TransactionStmt, raw_sql: &str) -> IrNode {
    match tx.kind() {
        TransactionStmtKind::TransStmtBegin | TransactionStmtKind::TransStmtStart => {
            IrNode::Transaction(TransactionControl::Begin)
        }
        TransactionStmtKind::TransStmtCommit => IrNode::Transaction(TransactionControl::Commit),
        TransactionStmtKind::TransStmtRollback => {
            IrNode::Transaction(TransactionControl::Rollback)
        }
        _ => ignored(raw_sql),
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// Convert a pg_query `Constraint` node into an IR `TableConstraint`.
///
/// `context_column` is the column name when converting an inline constraint
/// on a ColumnDef (used to fill in the constrained column). For table-level
/// constraints this is `None`.
fn convert_table_constraint(
    con: &pg_query::protobuf::Constraint,
    context_column: Option<&str>,
) -> Option<TableConstraint> {
    let name = optional_name(&con.conname);
    let with_context = |mut columns: Vec<String>| {
        if columns.is_empty()
            && let Some(col) = context_column
        {
            columns.push(col.to_string());
        }
        columns
    };

    match con.contype() {
        ConstrType::ConstrPrimary => Some(TableConstraint::PrimaryKey {
            columns: with_context(extract_string_list(&con.keys)),
        }),
        ConstrType::ConstrForeign => Some(TableConstraint::ForeignKey {
            name,
            columns: with_context(extract_string_list(&con.fk_attrs)),
            not_valid: con.skip_validation,
        }),
        ConstrType::ConstrUnique => Some(TableConstraint::Unique {
            name,
            columns: with_context(extract_string_list(&con.keys)),
        }),
        ConstrType::ConstrCheck => Some(TableConstraint::Check {
            name,
            not_valid: con.skip_validation,
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CREATE INDEX
// ---------------------------------------------------------------------------

/// Convert a pg_query `IndexStmt` to `IrNode::CreateIndex`.
fn convert_create_index(idx: &pg_query::protobuf::IndexStmt) -> IrNode {
    let columns = idx
        .index_params
        .iter()
        .filter_map(|p| match p.node.as_ref() {
            Some(NodeEnum::IndexElem(elem)) if !elem.name.is_empty() => {
                Some(IndexColumn::Column(elem.name.clone()))
            }
            Some(NodeEnum::IndexElem(_)) => Some(IndexColumn::Expression),
            _ => None,
        })
        .collect();

    IrNode::CreateIndex(CreateIndex {
        index_name: optional_name(&idx.idxname),
        table_name: relation_to_qualified_name(idx.relation.as_ref()),
        columns,
        concurrent: idx.concurrent,
        if_not_exists: idx.if_not_exists,
    })
}

// ---------------------------------------------------------------------------
// DROP statements
// ---------------------------------------------------------------------------

/// Convert a pg_query `DropStmt` to `DropIndex` / `DropTable`; other object
/// types are ignored.
fn convert_drop_stmt(drop: &pg_query::protobuf::DropStmt, raw_sql: &str) -> IrNode {
    match drop.remove_type() {
        ObjectType::ObjectIndex => IrNode::DropIndex(DropIndex {
            names: extract_qualified_names_from_drop_objects(&drop.objects)
                .into_iter()
                .map(|name| name.name)
                .collect(),
            concurrent: drop.concurrent,
            if_exists: drop.missing_ok,
        }),
        ObjectType::ObjectTable => IrNode::DropTable(DropTable {
            names: extract_qualified_names_from_drop_objects(&drop.objects),
            if_exists: drop.missing_ok,
        }),
        _ => ignored(raw_sql),
    }
}

/// Extract all qualified names from `DropStmt.objects[]`.
///
/// For `DROP TABLE foo, myschema.bar`, returns both names. Each object is a
/// `List` of `String` parts; the last part is the object name and the one
/// before it, if any, the schema.
fn extract_qualified_names_from_drop_objects(
    objects: &[pg_query::protobuf::Node],
) -> Vec<QualifiedName> {
    objects
        .iter()
        .filter_map(|obj| {
            let Some(NodeEnum::List(list)) = obj.node.as_ref() else {
                return None;
            };
            let parts = extract_string_list(&list.items);
            match parts.as_slice() {
                [] => None,
                [name] => Some(QualifiedName::unqualified(name)),
                [.., schema, name] => Some(QualifiedName::qualified(schema, name)),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert a pg_query `RangeVar` (relation reference) to a `QualifiedName`.
fn relation_to_qualified_name(rel: Option<&pg_query::protobuf::RangeVar>) -> QualifiedName {
    match rel {
        Some(r) if r.schemaname.is_empty() => QualifiedName::unqualified(&r.relname),
        Some(r) => QualifiedName::qualified(&r.schemaname, &r.relname),
        None => QualifiedName::unqualified("unknown"),
    }
}

/// Collect the `String` values of a node list, skipping anything else.
fn extract_string_list(nodes: &[pg_query::protobuf::Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| match n.node.as_ref() {
            Some(NodeEnum::String(s)) => Some(s.sval.clone()),
            _ => None,
        })
        .collect()
}
