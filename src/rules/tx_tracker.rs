//! Transaction state tracking
//!
//! Rules that care about transaction boundaries (concurrent index builds,
//! multiple table locks) replay the file's transaction-control statements
//! through a [`TxTracker`]. Each rule builds its own tracker for each file.

use std::collections::BTreeSet;

use crate::parser::ir::{IrNode, TransactionControl};

/// Whether statements currently execute inside a transaction, and which
/// tables that transaction has touched so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxState {
    OutsideTx,
    InsideTx { touched: BTreeSet<String> },
}

#[derive(Debug, Clone)]
pub struct TxTracker {
    state: TxState,
}

impl TxTracker {
    /// Start inside a transaction when `implicit_transaction` is set, which
    /// models migration tools that wrap each file in one transaction.
    pub fn new(implicit_transaction: bool) -> Self {
        let state = if implicit_transaction {
            TxState::InsideTx {
                touched: BTreeSet::new(),
            }
        } else {
            TxState::OutsideTx
        };
        Self { state }
    }

    pub fn state(&self) -> &TxState {
        &self.state
    }

    pub fn in_transaction(&self) -> bool {
        matches!(self.state, TxState::InsideTx { .. })
    }

    /// `BEGIN` / `START TRANSACTION`. A no-op when already inside.
    pub fn begin(&mut self) {
        if let TxState::OutsideTx = self.state {
            self.state = TxState::InsideTx {
                touched: BTreeSet::new(),
            };
        }
    }

    /// `COMMIT` / `END` / `ROLLBACK`: leave the transaction and forget its tables.
    pub fn end(&mut self) {
        self.state = TxState::OutsideTx;
    }

    /// Record that the current transaction touches `table`.
    ///
    /// Returns the number of distinct tables touched by the transaction after
    /// the insert, or 0 when outside a transaction.
    pub fn touch(&mut self, table: &str) -> usize {
        match &mut self.state {
            TxState::InsideTx { touched } => {
                if !touched.contains(table) {
                    touched.insert(table.to_string());
                }
                touched.len()
            }
            TxState::OutsideTx => 0,
        }
    }

    /// Apply the transition for `node` if it is a transaction-control statement.
    pub fn advance(&mut self, node: &IrNode) {
        match node {
            IrNode::Transaction(TransactionControl::Begin) => self.begin(),
            IrNode::Transaction(TransactionControl::Commit | TransactionControl::Rollback) => {
                self.end()
            }
            _ => {}
        }
    }
}
