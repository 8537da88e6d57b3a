//! Transaction list projection.
//!
//! Derives the page of transactions to render from a transaction collection
//! and a [`ViewState`]. The pipeline is
//!
//! 1. category filter (exact match, or `All`)
//! 2. search filter (case-insensitive substring of category, amount, type or
//!    formatted date)
//! 3. date-range filter (inclusive, on millisecond timestamps)
//! 4. stable sort by the selected order
//! 5. pagination window
//!
//! Projection is pure: the same collection and view state always produce the
//! same page, and equal sort keys keep their input order.

use serde::{Deserialize, Serialize};
use shared::Transaction;
use std::cmp::Ordering;
use tracing::debug;

use crate::config::DateDisplayConfig;
use crate::domain::transaction_table::TransactionTableService;
use crate::state::{SortOrder, ViewState};

/// One page of the filtered, sorted transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Transaction>,
    /// Number of transactions passing all filters, before pagination
    pub total_filtered_count: usize,
    /// Zero-based page index this page was cut at
    pub page: usize,
    /// Rows per page after clamping
    pub rows_per_page: usize,
}

impl Page {
    /// Number of pages needed for the filtered list
    pub fn page_count(&self) -> usize {
        self.total_filtered_count.div_ceil(self.rows_per_page.max(1))
    }

    pub fn has_next_page(&self) -> bool {
        self.page.saturating_add(1).saturating_mul(self.rows_per_page) < self.total_filtered_count
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 0
    }

    /// 1-based position of the first item in the filtered list
    pub fn first_item_number(&self) -> Option<usize> {
        (!self.items.is_empty()).then(|| self.page * self.rows_per_page + 1)
    }
}

/// Projects transaction collections through a view state
#[derive(Debug, Clone, Default)]
pub struct TransactionProjector {
    table: TransactionTableService,
}

impl TransactionProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projector whose search matches dates rendered with `config`
    pub fn with_config(config: &DateDisplayConfig) -> Self {
        Self {
            table: TransactionTableService::with_config(config),
        }
    }

    /// The formatting service used for search matching
    pub fn table(&self) -> &TransactionTableService {
        &self.table
    }

    /// Whether a transaction passes the category, search and date-range filters
    pub fn matches(&self, transaction: &Transaction, view: &ViewState) -> bool {
        let needle = view.search_query.to_lowercase();
        self.matches_with_needle(transaction, view, &needle)
    }

    fn matches_with_needle(&self, transaction: &Transaction, view: &ViewState, needle: &str) -> bool {
        view.selected_category.matches(&transaction.category)
            && self.table.matches_search(transaction, needle)
            && within_date_range(transaction, view)
    }

    /// Filter, sort and paginate `transactions` according to `view`
    pub fn project(&self, transactions: &[Transaction], view: &ViewState) -> Page {
        let needle = view.search_query.to_lowercase();

        let mut filtered: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| self.matches_with_needle(tx, view, &needle))
            .collect();

        // `sort_by` is stable, so ties keep their input order
        filtered.sort_by(|a, b| compare(a, b, view.sort_order));

        let total_filtered_count = filtered.len();
        let rows_per_page = view.effective_rows_per_page();
        let start = view.page.saturating_mul(rows_per_page);

        let items: Vec<Transaction> = filtered
            .into_iter()
            .skip(start)
            .take(rows_per_page)
            .cloned()
            .collect();

        debug!(
            "Projected {} of {} transactions (page {}, {} per page, {} shown)",
            total_filtered_count,
            transactions.len(),
            view.page,
            rows_per_page,
            items.len()
        );

        Page {
            items,
            total_filtered_count,
            page: view.page,
            rows_per_page,
        }
    }
}

/// Project with the default date display configuration
pub fn project(transactions: &[Transaction], view: &ViewState) -> Page {
    TransactionProjector::new().project(transactions, view)
}

fn within_date_range(transaction: &Transaction, view: &ViewState) -> bool {
    let after_start = view
        .start_bound_millis()
        .map_or(true, |start| transaction.date >= start);
    let before_end = view
        .end_bound_millis()
        .map_or(true, |end| transaction.date <= end);
    after_start && before_end
}

fn compare(a: &Transaction, b: &Transaction, order: SortOrder) -> Ordering {
    match order {
        SortOrder::AmountAsc => a.amount.total_cmp(&b.amount),
        SortOrder::AmountDesc => b.amount.total_cmp(&a.amount),
        SortOrder::DateAsc => a.date.cmp(&b.date),
        SortOrder::DateDesc => b.date.cmp(&a.date),
    }
}
