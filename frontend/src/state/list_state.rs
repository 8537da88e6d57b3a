//! # List State
//!
//! The local transaction collection owned by one view model, together with
//! the per-transaction deletion lifecycle:
//!
//! ```text
//! Present -> PendingRemoval -> Removed            (server confirmed)
//!                           -> Present            (rolled back)
//! ```
//!
//! A transaction that is `PendingRemoval` keeps its slot in the collection
//! but is hidden from every projection, so a rollback restores it at its
//! original position and the input order seen by the stable sort is
//! unchanged.

use std::collections::HashSet;

use shared::{DashboardTotals, Transaction};

/// Where a transaction is in its deletion lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Present,
    PendingRemoval,
    Removed,
}

#[derive(Debug, Clone)]
struct Entry {
    transaction: Transaction,
    pending_removal: bool,
}

/// Snapshot-derived state shared between a view model and its in-flight deletes
#[derive(Debug, Clone, Default)]
pub struct ListState {
    entries: Vec<Entry>,
    removed_ids: HashSet<String>,
    totals: DashboardTotals,
    categories: Vec<String>,
    skipped_records: usize,
}

impl ListState {
    pub fn new(
        transactions: Vec<Transaction>,
        totals: DashboardTotals,
        categories: Vec<String>,
        skipped_records: usize,
    ) -> Self {
        Self {
            entries: transactions
                .into_iter()
                .map(|transaction| Entry { transaction, pending_removal: false })
                .collect(),
            removed_ids: HashSet::new(),
            totals,
            categories,
            skipped_records,
        }
    }

    /// Transactions that projections may show, in collection order
    pub fn visible_transactions(&self) -> Vec<Transaction> {
        self.entries
            .iter()
            .filter(|entry| !entry.pending_removal)
            .map(|entry| entry.transaction.clone())
            .collect()
    }

    pub fn deletion_state(&self, id: &str) -> Option<DeletionState> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.transaction.id == id) {
            return Some(if entry.pending_removal {
                DeletionState::PendingRemoval
            } else {
                DeletionState::Present
            });
        }
        self.removed_ids.contains(id).then_some(DeletionState::Removed)
    }

    /// Hide a present transaction. Returns its prior state when it was not `Present`.
    pub fn begin_removal(&mut self, id: &str) -> Result<(), Option<DeletionState>> {
        match self.entries.iter_mut().find(|entry| entry.transaction.id == id) {
            Some(entry) if entry.pending_removal => Err(Some(DeletionState::PendingRemoval)),
            Some(entry) => {
                entry.pending_removal = true;
                Ok(())
            }
            None if self.removed_ids.contains(id) => Err(Some(DeletionState::Removed)),
            None => Err(None),
        }
    }

    /// Drop a pending transaction for good
    pub fn confirm_removal(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !(entry.pending_removal && entry.transaction.id == id));
        let removed = self.entries.len() < before;
        if removed {
            self.removed_ids.insert(id.to_string());
        }
        removed
    }

    /// Make a pending transaction visible again
    pub fn rollback_removal(&mut self, id: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.pending_removal && entry.transaction.id == id)
        {
            Some(entry) => {
                entry.pending_removal = false;
                true
            }
            None => false,
        }
    }

    pub fn totals(&self) -> DashboardTotals {
        self.totals
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    /// Replace the pass-through parts of the snapshot after a refetch
    pub fn refresh_summary(&mut self, totals: DashboardTotals, categories: Vec<String>) {
        self.totals = totals;
        self.categories = categories;
    }
}
