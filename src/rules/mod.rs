//! Rule engine and lint context
//!
//! Each rule implements the `Rule` trait and checks one parsed migration file
//! for a specific safety issue. Rules receive the file's IR nodes in source
//! order and return findings anchored at the offending statement.

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::parser::ir::{IrNode, Located, SourceSpan};

#[cfg(test)]
pub mod test_helpers;

mod alter_table_check;
mod column_type_check;

mod add_non_null_column;
mod change_column_type;
mod concurrent_in_tx;
mod constraint_excessive_lock;
mod drop_column;
mod drop_table;
mod missing_foreign_key_index;
mod missing_if_not_exists;
mod multiple_locks;
mod non_concurrent_index;
mod rename_column;
mod set_non_null_column;
mod use_timestamp_with_time_zone;

mod category;
mod finding;
mod lint_context;
mod rule_id;
pub mod tx_tracker;

pub use category::Category;
pub use finding::Finding;
pub use lint_context::LintContext;
pub use rule_id::RuleId;

/// A rule could not evaluate a statement it is responsible for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("malformed statement at byte {offset}: {reason}")]
    MalformedStatement { offset: usize, reason: String },
}

impl From<RuleId> for Box<dyn Rule> {
    fn from(value: RuleId) -> Self {
        Box::new(value)
    }
}

/// Trait that every rule implements.
pub trait Rule: Send + Sync {
    /// Stable rule identifier.
    fn id(&self) -> RuleId;

    /// One-line description of the problem.
    fn slug(&self) -> &'static str;

    /// Remediation advice.
    fn help(&self) -> &'static str;

    /// Detailed explanation for `pgcheck explain`. Includes failure mode, example, fix.
    fn explain(&self) -> &'static str;

    fn category(&self) -> Category;

    fn enabled_by_default(&self) -> bool;

    /// Run the rule against every statement of one file.
    ///
    /// Checks are pure: any state they need (such as a transaction tracker)
    /// is built from `ctx` for the duration of the call. An error aborts the
    /// evaluation of the whole file.
    fn check(
        &self,
        statements: &[Located<IrNode>],
        ctx: &LintContext,
    ) -> Result<Vec<Finding>, RuleError>;

    /// Convenience method to construct a Finding with this rule's ID, slug and help.
    fn make_finding(&self, span: &SourceSpan) -> Finding {
        Finding::new(self.id(), self.slug(), self.help(), span)
    }
}

/// Registry of all rules, in registration order.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty rule registry.
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    /// Register all built-in rules.
    pub fn register_defaults(&mut self) {
        RuleId::iter().for_each(|r| self.register(r.into()));
    }

    /// Register a single rule.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Get a rule by typed ID.
    pub fn get(&self, id: RuleId) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|b| &**b)
    }

    /// Iterate all rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|b| &**b)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register_defaults();
        registry
    }

    #[test]
    fn test_registry_order_is_declaration_order() {
        let codes: Vec<&str> = registry().iter().map(|r| r.id().as_str()).collect();
        assert_eq!(
            codes,
            vec![
                "drop-column",
                "drop-table",
                "rename-column",
                "change-column-type",
                "add-non-null-column",
                "set-non-null-column",
                "non-concurrent-index",
                "constraint-excessive-lock",
                "multiple-locks",
                "missing-if-not-exists",
                "missing-foreign-key-index",
                "concurrent-in-tx",
                "use-timestamp-with-time-zone",
            ]
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let registry = registry();
        let codes: HashSet<&str> = registry.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(codes.len(), registry.len());
    }

    #[test]
    fn test_only_multiple_locks_disabled_by_default() {
        let disabled: Vec<RuleId> = registry()
            .iter()
            .filter(|r| !r.enabled_by_default())
            .map(|r| r.id())
            .collect();
        assert_eq!(disabled, vec![RuleId::MultipleLocks]);
    }

    #[test]
    fn test_all_rules_have_slug_and_help() {
        for rule in registry().iter() {
            let id = rule.id();
            assert!(rule.slug().len() > 10, "{id} slug too short");
            assert!(rule.help().len() > 10, "{id} help too short");
        }
    }

    #[test]
    fn test_all_rules_have_valid_explain() {
        for rule in registry().iter() {
            let id = rule.id();
            let explain = rule.explain();
            assert!(
                explain.len() > 20,
                "{id} explain text too short: {explain:?}"
            );
            assert!(
                explain.contains(id.as_str()),
                "{id} explain text should reference its own rule code"
            );
        }
    }

    #[test]
    fn test_rule_id_display_round_trip() {
        for id in RuleId::iter() {
            let s = id.to_string();
            let parsed: RuleId = s.parse().unwrap_or_else(|_| panic!("failed to parse {s}"));
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn test_rule_id_from_str_unknown() {
        assert!("garbage".parse::<RuleId>().is_err());
        assert!("DROP-COLUMN".parse::<RuleId>().is_err()); // case-sensitive
        assert!("drop_column".parse::<RuleId>().is_err());
    }

    #[test]
    fn test_rule_id_serialize_json() {
        let json = serde_json::to_string(&RuleId::ConcurrentInTx).expect("serialize");
        assert_eq!(json, "\"concurrent-in-tx\"");
    }

    #[test]
    fn test_rule_id_deserialize_unknown_code() {
        let err = serde_json::from_str::<RuleId>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("unknown rule code 'nope'"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(RuleId::DropColumn.category(), Category::BreakingChange);
        assert_eq!(RuleId::MultipleLocks.category(), Category::Locking);
        assert_eq!(
            RuleId::UseTimestampWithTimeZone.category().to_string(),
            "types"
        );
        assert_eq!(
            RuleId::RenameColumn.category().to_string(),
            "breaking change"
        );
    }

    #[test]
    fn test_get_by_id() {
        let registry = registry();
        let rule = registry.get(RuleId::DropTable).expect("registered");
        assert_eq!(rule.id(), RuleId::DropTable);
        assert!(RuleRegistry::new().get(RuleId::DropTable).is_none());
    }
}
