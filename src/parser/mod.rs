//! SQL parsing and IR generation

pub mod ir;
pub(crate) mod pg_query;

pub use self::pg_query::{ParseError, parse_sql};
pub use ir::{
    AlterTable, AlterTableAction, ColumnDef, CreateIndex, CreateTable, DropIndex, DropTable,
    IndexColumn, IrNode, Located, QualifiedName, SourceSpan, TableConstraint, TransactionControl,
    TypeName,
};
