//! # Dashboard Configuration
//!
//! User-facing defaults for the transaction list, stored as a single YAML file.
//!
//! ## YAML Format
//!
//! ```yaml
//! default_rows_per_page: 5
//! rows_per_page_options: [5, 10, 25]
//! max_rows_per_page: 100
//! default_sort_order: dateDesc
//! date_display:
//!   utc_offset_minutes: 0
//!   pattern: "%b %-d, %Y, %I:%M %p"
//! refresh_totals_after_delete: true
//! log_filter: info
//! ```
//!
//! Every field is optional; missing fields take their default value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::state::SortOrder;

/// How transaction dates are rendered for display and for search matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateDisplayConfig {
    /// Fixed offset from UTC applied before formatting
    pub utc_offset_minutes: i32,
    /// chrono `strftime` pattern
    pub pattern: String,
}

impl Default for DateDisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            pattern: "%b %-d, %Y, %I:%M %p".to_string(),
        }
    }
}

/// Configuration for the transaction list view model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
    pub max_rows_per_page: usize,
    pub default_sort_order: SortOrder,
    pub date_display: DateDisplayConfig,
    /// Refetch totals and categories after a confirmed delete
    pub refresh_totals_after_delete: bool,
    /// Default `tracing` filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_rows_per_page: 5,
            rows_per_page_options: vec![5, 10, 25],
            max_rows_per_page: 100,
            default_sort_order: SortOrder::DateDesc,
            date_display: DateDisplayConfig::default(),
            refresh_totals_after_delete: true,
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: DashboardConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        debug!("Loaded dashboard config from {:?}", path);
        Ok(config.normalized())
    }

    /// Load configuration, falling back to defaults when the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yaml::to_string(self)?;

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved dashboard config to {:?}", path);
        Ok(())
    }

    /// Rows per page to start with, clamped into the valid range
    pub fn initial_rows_per_page(&self) -> usize {
        self.default_rows_per_page.clamp(1, self.max_rows_per_page.max(1))
    }

    fn normalized(mut self) -> Self {
        self.max_rows_per_page = self.max_rows_per_page.max(1);
        self.default_rows_per_page = self.initial_rows_per_page();
        let max = self.max_rows_per_page;
        self.rows_per_page_options.retain(|rows| (1..=max).contains(rows));
        self.rows_per_page_options.sort_unstable();
        self.rows_per_page_options.dedup();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_dashboard_layout() {
        let config = DashboardConfig::default();

        assert_eq!(config.default_rows_per_page, 5);
        assert_eq!(config.default_sort_order, SortOrder::DateDesc);
        assert_eq!(config.date_display.utc_offset_minutes, 0);
        assert!(config.refresh_totals_after_delete);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.yaml");
        fs::write(&path, "default_rows_per_page: 10\ndefault_sort_order: amountAsc\n").unwrap();

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config.default_rows_per_page, 10);
        assert_eq!(config.default_sort_order, SortOrder::AmountAsc);
        assert_eq!(config.max_rows_per_page, 100);
        assert_eq!(config.date_display, DateDisplayConfig::default());
    }

    #[test]
    fn test_load_clamps_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.yaml");
        fs::write(
            &path,
            "default_rows_per_page: 0\nmax_rows_per_page: 20\nrows_per_page_options: [50, 10, 0, 10, 5]\n",
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config.default_rows_per_page, 1);
        assert_eq!(config.rows_per_page_options, vec![5, 10]);
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dashboard.yaml");
        let mut config = DashboardConfig::default();
        config.date_display.utc_offset_minutes = -300;
        config.refresh_totals_after_delete = false;

        config.save(&path).unwrap();
        let loaded = DashboardConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = DashboardConfig::load_or_default(&temp_dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard.yaml");
        fs::write(&path, "default_sort_order: sideways\n").unwrap();

        assert!(DashboardConfig::load(&path).is_err());
    }
}
