//! # Snapshot File API
//!
//! A [`DashboardApi`] backed by a JSON file holding a `DashboardData`
//! document. Deleting a transaction rewrites the file; writes go to a temp
//! file first and are renamed into place.

use async_trait::async_trait;
use shared::{DashboardData, DeleteTransactionResponse};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::TransactionMapper;
use crate::errors::ApiError;
use crate::services::api::DashboardApi;

/// Dashboard data source reading from and writing to a JSON snapshot file
pub struct SnapshotFileApi {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl SnapshotFileApi {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot to the backing file
    pub fn write_snapshot(&self, data: &DashboardData) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;
        debug!("Wrote dashboard snapshot to {:?}", self.path);
        Ok(())
    }

    fn read_snapshot(&self) -> Result<DashboardData, ApiError> {
        let json = fs::read_to_string(&self.path)
            .map_err(|e| ApiError::Network(format!("Failed to read {:?}: {}", self.path, e)))?;
        serde_json::from_str(&json)
            .map_err(|e| ApiError::Network(format!("Failed to parse {:?}: {}", self.path, e)))
    }
}

#[async_trait]
impl DashboardApi for SnapshotFileApi {
    async fn fetch_dashboard(&self) -> Result<DashboardData, ApiError> {
        let data = self.read_snapshot()?;
        debug!(
            "Read snapshot with {} transactions from {:?}",
            data.transactions.len(),
            self.path
        );
        Ok(data)
    }

    async fn delete_transaction(&self, id: &str) -> Result<DeleteTransactionResponse, ApiError> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_snapshot()?;

        // Only the record the client can see: the first valid one with this id
        let position = data
            .transactions
            .iter()
            .enumerate()
            .position(|(index, record)| {
                record.id().as_deref() == Some(id)
                    && TransactionMapper::from_record(index, record.clone()).is_ok()
            })
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        data.transactions.remove(position);

        self.write_snapshot(&data)
            .map_err(|e| ApiError::Network(format!("Failed to write snapshot: {}", e)))?;

        info!("Deleted transaction {} from {:?}", id, self.path);
        Ok(DeleteTransactionResponse { id: id.to_string() })
    }
}
