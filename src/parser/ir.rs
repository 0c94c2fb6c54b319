//! Intermediate Representation (IR) for SQL statements
//!
//! The IR layer decouples the parser from the rule engine. It represents
//! only the information needed for linting, not the full PostgreSQL AST.

use std::fmt;

/// A parsed top-level SQL statement mapped to a high-level operation.
/// Each variant carries only the fields rules need, not the full AST.
#[derive(Debug, Clone, PartialEq)]
pub enum IrNode {
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    DropTable(DropTable),
    RenameColumn {
        table: QualifiedName,
        old_name: String,
        new_name: String,
    },
    /// `BEGIN`, `COMMIT`, `ROLLBACK` and friends.
    Transaction(TransactionControl),
    /// SQL that parsed successfully but has no IR mapping (e.g., GRANT, COMMENT ON).
    /// Not an error, just not relevant to linting.
    Ignored { raw_sql: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: QualifiedName,
    pub columns: Vec<ColumnDef>,
    /// Table-level constraints plus inline column constraints promoted to table level.
    pub constraints: Vec<TableConstraint>,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTable {
    pub name: QualifiedName,
    pub actions: Vec<AlterTableAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    AddColumn {
        column: ColumnDef,
        /// Inline `REFERENCES`, `UNIQUE`, `CHECK`, `PRIMARY KEY` on the new column.
        inline_constraints: Vec<TableConstraint>,
    },
    DropColumn {
        name: String,
    },
    AddConstraint(TableConstraint),
    AlterColumnType {
        column_name: String,
        new_type: TypeName,
    },
    SetNotNull {
        column_name: String,
    },
    /// Catch-all for ALTER TABLE actions we parse but don't model.
    Other {
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub index_name: Option<String>,
    pub table_name: QualifiedName,
    pub columns: Vec<IndexColumn>,
    pub concurrent: bool,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropIndex {
    pub names: Vec<String>,
    pub concurrent: bool,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub names: Vec<QualifiedName>,
    pub if_exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionControl {
    /// `BEGIN` or `START TRANSACTION`.
    Begin,
    /// `COMMIT` or `END`.
    Commit,
    Rollback,
}

// --- Supporting types ---

/// Schema-qualified name. `schema` is None for unqualified references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Key used when comparing tables across statements of one file.
    /// Ignores the schema, so `public.orders` and `orders` share a key.
    pub fn table_key(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(s) => write!(f, "{}.{}", s, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub type_name: TypeName,
    pub nullable: bool, // true = nullable (default), false = NOT NULL or PRIMARY KEY
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    /// The base type name, lowercased: "int4", "timestamp", "timestamptz", etc.
    /// Modifiers such as `(10, 2)` are not kept.
    pub name: String,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
        }
    }

    /// `timestamp` / `timestamp without time zone`.
    pub fn is_timestamp_without_time_zone(&self) -> bool {
        self.name == "timestamp"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        not_valid: bool,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Check {
        name: Option<String>,
        not_valid: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndexColumn {
    Column(String),
    /// Expression element such as `lower(email)`.
    Expression,
}

impl IndexColumn {
    pub fn column_name(&self) -> Option<&str> {
        match self {
            IndexColumn::Column(name) => Some(name),
            IndexColumn::Expression => None,
        }
    }
}

/// A parsed statement with its source location.
#[derive(Debug, Clone)]
pub struct Located<T> {
    pub node: T,
    pub span: SourceSpan,
}

/// Location of a statement in its source file.
///
/// `start_offset..end_offset` is the statement's raw byte range as reported by
/// PostgreSQL: it begins right after the previous statement's `;`, so comments
/// and blank lines in front of a statement belong to it. The terminating `;`
/// is not part of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpan {
    pub start_offset: usize, // byte offset from start of file
    pub end_offset: usize,
}
