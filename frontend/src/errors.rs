//! Error types for the dashboard view model and its service seams.

use thiserror::Error;

/// Failure reported by the remote dashboard API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure or a server-side rejection
    #[error("Network error: {0}")]
    Network(String),

    /// The server has no transaction with this id
    #[error("Transaction '{0}' not found on the server")]
    NotFound(String),

    /// The session token was missing, expired or rejected
    #[error("Not authorized")]
    Unauthorized,
}

/// Errors surfaced by the transaction list view model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The initial dashboard snapshot did not arrive; no projection is possible
    #[error("Failed to load dashboard data: {0}")]
    FetchFailed(#[source] ApiError),

    /// The delete mutation was rejected; the transaction has been restored
    #[error("Failed to delete transaction '{id}': {source}")]
    DeleteFailed {
        id: String,
        #[source]
        source: ApiError,
    },

    /// No transaction with this id is present
    #[error("Transaction '{0}' not found")]
    DeleteNotFound(String),

    /// A delete for this id is already in flight
    #[error("Transaction '{0}' is already being deleted")]
    DeletePending(String),

    /// A record was missing required fields and was left out of the list
    #[error("Skipped malformed transaction at position {index}: {reason}")]
    MalformedTransaction { index: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_delete_failed_message_and_source() {
        let error = DashboardError::DeleteFailed {
            id: "t1".to_string(),
            source: ApiError::Network("connection reset".to_string()),
        };

        assert_eq!(
            error.to_string(),
            "Failed to delete transaction 't1': Network error: connection reset"
        );
        assert_eq!(
            error.source().map(|s| s.to_string()),
            Some("Network error: connection reset".to_string())
        );
    }

    #[test]
    fn test_malformed_message() {
        let error = DashboardError::MalformedTransaction {
            index: 3,
            reason: "missing category".to_string(),
        };
        assert_eq!(error.to_string(), "Skipped malformed transaction at position 3: missing category");
    }
}
