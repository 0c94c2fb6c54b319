use crate::rules::tx_tracker::TxTracker;

/// Context available to rules during linting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintContext {
    /// Whether the migration runs inside an ambient transaction unless its own
    /// transaction-control statements say otherwise.
    pub implicit_transaction: bool,
}

impl LintContext {
    pub fn new(implicit_transaction: bool) -> Self {
        Self {
            implicit_transaction,
        }
    }

    /// A fresh transaction tracker for one rule's pass over a file.
    pub fn tx_tracker(&self) -> TxTracker {
        TxTracker::new(self.implicit_transaction)
    }
}

impl Default for LintContext {
    fn default() -> Self {
        Self::new(true)
    }
}
