//! # View State
//!
//! The user-adjustable parameters that decide which transactions the list
//! shows and in which order. Created when the dashboard mounts and discarded
//! when the user navigates away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DashboardConfig;

/// Category selection; `All` is the "no filter" sentinel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Build a filter from the value of the category select box
    pub fn from_selection(value: &str) -> Self {
        if value == "All" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// Exact-match test against a transaction's category
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

/// Sort order options offered by the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Date (newest first)
    #[default]
    DateDesc,
    /// Date (oldest first)
    DateAsc,
    /// Amount (high to low)
    AmountDesc,
    /// Amount (low to high)
    AmountAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::DateDesc,
        SortOrder::DateAsc,
        SortOrder::AmountDesc,
        SortOrder::AmountAsc,
    ];

    /// Label shown in the sort select box
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::DateDesc => "Date (Newest First)",
            SortOrder::DateAsc => "Date (Oldest First)",
            SortOrder::AmountDesc => "Amount (High to Low)",
            SortOrder::AmountAsc => "Amount (Low to High)",
        }
    }
}

/// All parameters controlling the transaction projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_category: CategoryFilter,
    /// Free text, matched case-insensitively
    pub search_query: String,
    /// Inclusive lower bound (midnight UTC of this day)
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound (midnight UTC of this day)
    pub end_date: Option<NaiveDate>,
    pub sort_order: SortOrder,
    /// Zero-based page index
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_category: CategoryFilter::All,
            search_query: String::new(),
            start_date: None,
            end_date: None,
            sort_order: SortOrder::DateDesc,
            page: 0,
            rows_per_page: 5,
        }
    }
}

impl ViewState {
    /// Initial view state for a freshly mounted dashboard
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            sort_order: config.default_sort_order,
            rows_per_page: config.initial_rows_per_page(),
            ..Self::default()
        }
    }

    /// Parse the text of a date input (`YYYY-MM-DD`).
    ///
    /// Empty or unparsable input means the bound is unset.
    pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
    }

    /// Epoch milliseconds of the start bound, if set
    pub fn start_bound_millis(&self) -> Option<i64> {
        self.start_date.map(midnight_utc_millis)
    }

    /// Epoch milliseconds of the end bound, if set.
    ///
    /// This is midnight at the *start* of the end day, so later times on
    /// that day fall outside the range.
    pub fn end_bound_millis(&self) -> Option<i64> {
        self.end_date.map(midnight_utc_millis)
    }

    /// Rows per page with zero clamped to one
    pub fn effective_rows_per_page(&self) -> usize {
        self.rows_per_page.max(1)
    }
}

fn midnight_utc_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .unwrap_or_default()
}
