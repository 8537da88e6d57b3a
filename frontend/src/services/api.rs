//! # Dashboard API
//!
//! The remote data source seen by the view model: one read returning the
//! whole dashboard snapshot, and one mutation deleting a transaction by id.
//! Transport is left to implementations.

use async_trait::async_trait;
use shared::{DashboardData, DeleteTransactionResponse};

use crate::errors::ApiError;

/// Trait defining the remote operations the dashboard depends on
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch totals, categories and all transactions for the signed-in user
    async fn fetch_dashboard(&self) -> Result<DashboardData, ApiError>;

    /// Delete a transaction.
    ///
    /// A successful response means the transaction no longer exists upstream.
    async fn delete_transaction(&self, id: &str) -> Result<DeleteTransactionResponse, ApiError>;
}
