//! # Transaction List View Model
//!
//! Owns the dashboard's view parameters and its local copy of the user's
//! transactions, derives the page to render, and runs optimistic deletes.
//!
//! ## Optimistic delete
//!
//! [`TransactionListViewModel::request_delete`] hides the transaction before
//! it returns, then hands back a future that performs the server round trip:
//!
//! - success: the removal becomes permanent (and totals are refetched when
//!   configured)
//! - server reports the id as unknown: the removal is kept, since upstream no
//!   longer has it, and `DeleteNotFound` is reported
//! - any other failure: the transaction reappears at its original position and
//!   `DeleteFailed` is reported
//!
//! The future only holds a weak reference to the collection, so dropping the
//! view model while a delete is in flight is fine; the late result is ignored.
//! Dropping the future itself before it settles (never awaited, timed out,
//! task aborted) un-hides the transaction, since no confirmation can arrive.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, Weak};

use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;
use crate::domain::{FormattedTransaction, Page, TransactionMapper, TransactionProjector};
use crate::errors::{ApiError, DashboardError};
use crate::services::{DashboardApi, SessionStore};
use crate::state::{CategoryFilter, DeletionState, ListState, SortOrder, ViewState};
use shared::{DashboardData, DashboardTotals, Transaction};

/// Result of a delete request
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub success: bool,
    pub error: Option<DashboardError>,
}

impl DeleteOutcome {
    fn succeeded() -> Self {
        Self { success: true, error: None }
    }

    fn failed(error: DashboardError) -> Self {
        Self { success: false, error: Some(error) }
    }
}

/// View model behind the dashboard's transaction list
pub struct TransactionListViewModel {
    list: Arc<RwLock<ListState>>,
    view: ViewState,
    projector: TransactionProjector,
    api: Arc<dyn DashboardApi>,
    session: Arc<dyn SessionStore>,
    config: DashboardConfig,
}

impl TransactionListViewModel {
    /// Fetch the dashboard snapshot and build a view model over it
    pub async fn load(
        api: Arc<dyn DashboardApi>,
        session: Arc<dyn SessionStore>,
        config: DashboardConfig,
    ) -> Result<Self, DashboardError> {
        let data = api.fetch_dashboard().await.map_err(|e| {
            error!("Failed to load dashboard: {}", e);
            DashboardError::FetchFailed(e)
        })?;

        Ok(Self::from_snapshot(data, api, session, config))
    }

    /// Build a view model over an already fetched snapshot
    pub fn from_snapshot(
        data: DashboardData,
        api: Arc<dyn DashboardApi>,
        session: Arc<dyn SessionStore>,
        config: DashboardConfig,
    ) -> Self {
        let totals = data.totals();
        let categories = TransactionMapper::map_categories(data.categories);
        let mapped = TransactionMapper::map_records(data.transactions);

        info!(
            "Loaded {} transactions in {} categories ({} skipped)",
            mapped.transactions.len(),
            categories.len(),
            mapped.skipped.len()
        );

        let list = ListState::new(mapped.transactions, totals, categories, mapped.skipped.len());

        Self {
            list: Arc::new(RwLock::new(list)),
            view: ViewState::from_config(&config),
            projector: TransactionProjector::with_config(&config.date_display),
            api,
            session,
            config,
        }
    }

    fn read_list(&self) -> RwLockReadGuard<'_, ListState> {
        self.list.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn totals(&self) -> DashboardTotals {
        self.read_list().totals()
    }

    pub fn categories(&self) -> Vec<String> {
        self.read_list().categories().to_vec()
    }

    /// Number of records left out of the list because they were malformed
    pub fn skipped_records(&self) -> usize {
        self.read_list().skipped_records()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Transactions currently shown to projections (pending deletes excluded)
    pub fn visible_transactions(&self) -> Vec<Transaction> {
        self.read_list().visible_transactions()
    }

    pub fn deletion_state(&self, id: &str) -> Option<DeletionState> {
        self.read_list().deletion_state(id)
    }

    /// The page to render for the current view state
    pub fn current_page(&self) -> Page {
        let transactions = self.visible_transactions();
        self.projector.project(&transactions, &self.view)
    }

    /// The current page formatted for display, numbered across pages
    pub fn formatted_page(&self) -> Vec<FormattedTransaction> {
        let page = self.current_page();
        let first_number = page.first_item_number().unwrap_or(1);
        self.projector
            .table()
            .format_transactions_for_table(&page.items, first_number)
    }

    /// Select a category; unknown categories fall back to `All`
    pub fn set_category(&mut self, filter: CategoryFilter) {
        let filter = match filter {
            CategoryFilter::Only(category) if !self.read_list().categories().contains(&category) => {
                warn!("Unknown category '{}', showing all categories", category);
                CategoryFilter::All
            }
            other => other,
        };
        self.view.selected_category = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.view.search_query = query.into();
    }

    /// Set the start bound from date-input text; empty or invalid text clears it
    pub fn set_start_date(&mut self, input: &str) {
        self.view.start_date = ViewState::parse_date_input(input);
    }

    /// Set the end bound from date-input text; empty or invalid text clears it
    pub fn set_end_date(&mut self, input: &str) {
        self.view.end_date = ViewState::parse_date_input(input);
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.view.sort_order = order;
    }

    /// Jump to a zero-based page; negative values clamp to the first page
    pub fn set_page(&mut self, page: i64) {
        self.view.page = usize::try_from(page.max(0)).unwrap_or(usize::MAX);
    }

    pub fn next_page(&mut self) {
        if self.current_page().has_next_page() {
            self.view.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        self.view.page = self.view.page.saturating_sub(1);
    }

    /// Change the page size (clamped to the configured range) and go back to the first page
    pub fn set_rows_per_page(&mut self, rows: i64) {
        let max = i64::try_from(self.config.max_rows_per_page.max(1)).unwrap_or(i64::MAX);
        let rows = rows.clamp(1, max);
        self.view.rows_per_page = usize::try_from(rows).unwrap_or(1);
        self.view.page = 0;
    }

    /// Page sizes to offer in the rows-per-page picker: the configured
    /// options plus the current size when it isn't one of them
    pub fn rows_per_page_options(&self) -> Vec<usize> {
        let mut options = self.config.rows_per_page_options.clone();
        if !options.contains(&self.view.rows_per_page) {
            options.push(self.view.rows_per_page);
            options.sort_unstable();
        }
        options
    }

    /// Back to the initial view state, as when the dashboard is first mounted
    pub fn reset_view(&mut self) {
        self.view = ViewState::from_config(&self.config);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Explicit logout: forget the session token
    pub fn logout(&self) -> anyhow::Result<()> {
        self.session.clear_token()?;
        info!("Logged out");
        Ok(())
    }

    /// Delete a transaction optimistically.
    ///
    /// The transaction is hidden before this returns; the returned future
    /// performs the server call and settles the deletion. A second request
    /// for an id that is already pending is rejected with `DeletePending`.
    pub fn request_delete(
        &self,
        transaction_id: &str,
    ) -> impl Future<Output = DeleteOutcome> + Send + 'static {
        let id = transaction_id.to_string();
        let started = self
            .list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_removal(&id)
            .map(|()| PendingRemoval::new(Arc::downgrade(&self.list), id.clone()));

        let api = Arc::clone(&self.api);
        let refresh_totals = self.config.refresh_totals_after_delete;

        async move {
            let mut pending = match started {
                Ok(pending) => pending,
                Err(prior) => {
                    let error = match prior {
                        Some(DeletionState::PendingRemoval) => DashboardError::DeletePending(id),
                        _ => DashboardError::DeleteNotFound(id),
                    };
                    warn!("{}", error);
                    return DeleteOutcome::failed(error);
                }
            };

            debug!("Transaction {} hidden, awaiting server", id);

            match api.delete_transaction(&id).await {
                Ok(response) => {
                    pending.confirm();
                    info!("Deleted transaction {}", response.id);
                    if refresh_totals {
                        refresh_summary(&pending.list, api.as_ref()).await;
                    }
                    DeleteOutcome::succeeded()
                }
                Err(ApiError::NotFound(_)) => {
                    pending.confirm();
                    let error = DashboardError::DeleteNotFound(id);
                    warn!("{}", error);
                    DeleteOutcome::failed(error)
                }
                Err(source) => {
                    pending.rollback();
                    let error = DashboardError::DeleteFailed { id, source };
                    warn!("{}; transaction restored", error);
                    DeleteOutcome::failed(error)
                }
            }
        }
    }
}

/// A hidden transaction awaiting the server's answer.
///
/// Dropping it unsettled (the delete future was dropped, timed out or its
/// task aborted) makes the transaction visible again.
struct PendingRemoval {
    list: Weak<RwLock<ListState>>,
    id: String,
    settled: bool,
}

impl PendingRemoval {
    fn new(list: Weak<RwLock<ListState>>, id: String) -> Self {
        Self { list, id, settled: false }
    }

    fn confirm(&mut self) {
        self.settled = true;
        with_list(&self.list, |list| list.confirm_removal(&self.id));
    }

    fn rollback(&mut self) {
        self.settled = true;
        with_list(&self.list, |list| list.rollback_removal(&self.id));
    }
}

impl Drop for PendingRemoval {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Delete of transaction {} abandoned; transaction restored", self.id);
            self.rollback();
        }
    }
}

/// Run `f` against the collection if its view model is still alive
fn with_list<R>(list: &Weak<RwLock<ListState>>, f: impl FnOnce(&mut ListState) -> R) -> Option<R> {
    match list.upgrade() {
        Some(list) => {
            let mut guard = list.write().unwrap_or_else(PoisonError::into_inner);
            Some(f(&mut guard))
        }
        None => {
            debug!("View model dropped before the delete settled");
            None
        }
    }
}

/// Refetch totals and categories after a confirmed delete
async fn refresh_summary(list: &Weak<RwLock<ListState>>, api: &dyn DashboardApi) {
    if list.strong_count() == 0 {
        return;
    }

    match api.fetch_dashboard().await {
        Ok(data) => {
            let totals = data.totals();
            let categories = TransactionMapper::map_categories(data.categories);
            with_list(list, |list| list.refresh_summary(totals, categories));
        }
        Err(e) => warn!("Failed to refresh totals after delete: {}", e),
    }
}
