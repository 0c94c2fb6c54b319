use serde::Serialize;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::{
    Finding, IrNode, Located, Rule,
    rules::{LintContext, RuleError, category::Category},
};

/// Strongly-typed rule identifier.
///
/// Declaration order is registration order: findings on the same statement
/// are reported in this order, and `pgcheck rules` lists rules in it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumString, IntoStaticStr,
)]
pub enum RuleId {
    // Breaking changes
    /// `ALTER TABLE ... DROP COLUMN`.
    #[strum(serialize = "drop-column")]
    DropColumn,
    /// `DROP TABLE`.
    #[strum(serialize = "drop-table")]
    DropTable,
    /// `ALTER TABLE ... RENAME COLUMN`.
    #[strum(serialize = "rename-column")]
    RenameColumn,
    /// `ALTER TABLE ... ALTER COLUMN ... TYPE`.
    #[strum(serialize = "change-column-type")]
    ChangeColumnType,

    // Nullability
    /// `ADD COLUMN ... NOT NULL` without a `DEFAULT`.
    #[strum(serialize = "add-non-null-column")]
    AddNonNullColumn,
    /// `ALTER COLUMN ... SET NOT NULL`.
    #[strum(serialize = "set-non-null-column")]
    SetNonNullColumn,

    // Locking
    /// `CREATE INDEX` / `DROP INDEX` without `CONCURRENTLY`.
    #[strum(serialize = "non-concurrent-index")]
    NonConcurrentIndex,
    /// `ADD CONSTRAINT` of a foreign key or check without `NOT VALID`.
    #[strum(serialize = "constraint-excessive-lock")]
    ConstraintExcessiveLock,
    /// One transaction altering more than one table.
    #[strum(serialize = "multiple-locks")]
    MultipleLocks,

    // Idempotency
    /// `CREATE TABLE` / named `CREATE INDEX` without `IF NOT EXISTS`.
    #[strum(serialize = "missing-if-not-exists")]
    MissingIfNotExists,

    // Miscellaneous
    /// Foreign key without an index on the referencing columns.
    #[strum(serialize = "missing-foreign-key-index")]
    MissingForeignKeyIndex,
    /// `CONCURRENTLY` index operation inside a transaction.
    #[strum(serialize = "concurrent-in-tx")]
    ConcurrentInTx,

    // Types
    /// `timestamp` without time zone.
    #[strum(serialize = "use-timestamp-with-time-zone")]
    UseTimestampWithTimeZone,
}

impl RuleId {
    /// Zero-allocation string representation: the rule's code.
    ///
    /// Delegates to the [`IntoStaticStr`] derive which maps each variant to
    /// its `#[strum(serialize = "…")]` string.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for RuleId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown rule code '{s}'")))
    }
}

// `FromStr` is derived via `EnumString`. `Err` type is `strum::ParseError`.

impl Rule for RuleId {
    fn id(&self) -> Self {
        *self
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::DropColumn => super::drop_column::SLUG,
            Self::DropTable => super::drop_table::SLUG,
            Self::RenameColumn => super::rename_column::SLUG,
            Self::ChangeColumnType => super::change_column_type::SLUG,
            Self::AddNonNullColumn => super::add_non_null_column::SLUG,
            Self::SetNonNullColumn => super::set_non_null_column::SLUG,
            Self::NonConcurrentIndex => super::non_concurrent_index::SLUG,
            Self::ConstraintExcessiveLock => super::constraint_excessive_lock::SLUG,
            Self::MultipleLocks => super::multiple_locks::SLUG,
            Self::MissingIfNotExists => super::missing_if_not_exists::SLUG,
            Self::MissingForeignKeyIndex => super::missing_foreign_key_index::SLUG,
            Self::ConcurrentInTx => super::concurrent_in_tx::SLUG,
            Self::UseTimestampWithTimeZone => super::use_timestamp_with_time_zone::SLUG,
        }
    }

    fn help(&self) -> &'static str {
        match self {
            Self::DropColumn => super::drop_column::HELP,
            Self::DropTable => super::drop_table::HELP,
            Self::RenameColumn => super::rename_column::HELP,
            Self::ChangeColumnType => super::change_column_type::HELP,
            Self::AddNonNullColumn => super::add_non_null_column::HELP,
            Self::SetNonNullColumn => super::set_non_null_column::HELP,
            Self::NonConcurrentIndex => super::non_concurrent_index::HELP,
            Self::ConstraintExcessiveLock => super::constraint_excessive_lock::HELP,
            Self::MultipleLocks => super::multiple_locks::HELP,
            Self::MissingIfNotExists => super::missing_if_not_exists::HELP,
            Self::MissingForeignKeyIndex => super::missing_foreign_key_index::HELP,
            Self::ConcurrentInTx => super::concurrent_in_tx::HELP,
            Self::UseTimestampWithTimeZone => super::use_timestamp_with_time_zone::HELP,
        }
    }

    fn explain(&self) -> &'static str {
        match self {
            Self::DropColumn => super::drop_column::EXPLAIN,
            Self::DropTable => super::drop_table::EXPLAIN,
            Self::RenameColumn => super::rename_column::EXPLAIN,
            Self::ChangeColumnType => super::change_column_type::EXPLAIN,
            Self::AddNonNullColumn => super::add_non_null_column::EXPLAIN,
            Self::SetNonNullColumn => super::set_non_null_column::EXPLAIN,
            Self::NonConcurrentIndex => super::non_concurrent_index::EXPLAIN,
            Self::ConstraintExcessiveLock => super::constraint_excessive_lock::EXPLAIN,
            Self::MultipleLocks => super::multiple_locks::EXPLAIN,
            Self::MissingIfNotExists => super::missing_if_not_exists::EXPLAIN,
            Self::MissingForeignKeyIndex => super::missing_foreign_key_index::EXPLAIN,
            Self::ConcurrentInTx => super::concurrent_in_tx::EXPLAIN,
            Self::UseTimestampWithTimeZone => super::use_timestamp_with_time_zone::EXPLAIN,
        }
    }

    fn category(&self) -> Category {
        match self {
            Self::DropColumn | Self::DropTable | Self::RenameColumn | Self::ChangeColumnType => {
                Category::BreakingChange
            }
            Self::AddNonNullColumn | Self::SetNonNullColumn => Category::Nullability,
            Self::NonConcurrentIndex | Self::ConstraintExcessiveLock | Self::MultipleLocks => {
                Category::Locking
            }
            Self::MissingIfNotExists => Category::Idempotency,
            Self::MissingForeignKeyIndex | Self::ConcurrentInTx => Category::Miscellaneous,
            Self::UseTimestampWithTimeZone => Category::Types,
        }
    }

    fn enabled_by_default(&self) -> bool {
        // Experimental rules are opt-in.
        !matches!(self, Self::MultipleLocks)
    }

    fn check(
        &self,
        statements: &[Located<IrNode>],
        ctx: &LintContext,
    ) -> Result<Vec<Finding>, RuleError> {
        match self {
            Self::DropColumn => super::drop_column::check(*self, statements, ctx),
            Self::DropTable => super::drop_table::check(*self, statements, ctx),
            Self::RenameColumn => super::rename_column::check(*self, statements, ctx),
            Self::ChangeColumnType => super::change_column_type::check(*self, statements, ctx),
            Self::AddNonNullColumn => super::add_non_null_column::check(*self, statements, ctx),
            Self::SetNonNullColumn => super::set_non_null_column::check(*self, statements, ctx),
            Self::NonConcurrentIndex => super::non_concurrent_index::check(*self, statements, ctx),
            Self::ConstraintExcessiveLock => {
                super::constraint_excessive_lock::check(*self, statements, ctx)
            }
            Self::MultipleLocks => super::multiple_locks::check(*self, statements, ctx),
            Self::MissingIfNotExists => super::missing_if_not_exists::check(*self, statements, ctx),
            Self::MissingForeignKeyIndex => {
                super::missing_foreign_key_index::check(*self, statements, ctx)
            }
            Self::ConcurrentInTx => super::concurrent_in_tx::check(*self, statements, ctx),
            Self::UseTimestampWithTimeZone => {
                super::use_timestamp_with_time_zone::check(*self, statements, ctx)
            }
        }
    }
}
