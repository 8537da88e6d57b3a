//! Transaction table presentation logic.
//!
//! Turns validated transactions into the strings the list shows, and provides
//! the exact renderings the search predicate matches against. Both uses must
//! agree, so the formatted date a user sees is the one their query is tested
//! against.
//!
//! Search against the formatted date depends on the configured pattern and
//! offset: a query like `"nov"` matches under the default pattern but not
//! under an ISO pattern. Known limitation.

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::{Transaction, TransactionType};
use tracing::warn;

use crate::config::DateDisplayConfig;

/// A transaction ready for display in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedTransaction {
    pub id: String,
    /// 1-based position in the overall filtered list
    pub number: usize,
    pub category: String,
    pub formatted_amount: String,
    pub transaction_type: TransactionType,
    pub formatted_date: String,
}

impl FormattedTransaction {
    /// One-line rendering in the dashboard list layout
    pub fn to_line(&self) -> String {
        format!(
            "{}. Category: {} | Amount: {} | Type: {} | Date: {}",
            self.number, self.category, self.formatted_amount, self.transaction_type, self.formatted_date
        )
    }
}

/// Formatting service for transaction list display
#[derive(Debug, Clone)]
pub struct TransactionTableService {
    offset: FixedOffset,
    pattern: String,
}

impl TransactionTableService {
    /// Create a service with the default display configuration
    pub fn new() -> Self {
        Self::with_config(&DateDisplayConfig::default())
    }

    /// Create a service with a custom display configuration.
    ///
    /// An invalid pattern or out-of-range offset falls back to the default.
    pub fn with_config(config: &DateDisplayConfig) -> Self {
        let default = DateDisplayConfig::default();

        let offset = FixedOffset::east_opt(config.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| {
                warn!("UTC offset of {} minutes is out of range, using UTC", config.utc_offset_minutes);
                Utc.fix()
            });

        let pattern = if is_valid_pattern(&config.pattern) {
            config.pattern.clone()
        } else {
            warn!("Invalid date pattern '{}', using '{}'", config.pattern, default.pattern);
            default.pattern
        };

        Self { offset, pattern }
    }

    /// Format an epoch-millisecond timestamp for display
    pub fn format_date(&self, millis: i64) -> String {
        match Utc.timestamp_millis_opt(millis).single() {
            Some(date) => date.with_timezone(&self.offset).format(&self.pattern).to_string(),
            // Outside chrono's range; show the raw value rather than nothing
            None => millis.to_string(),
        }
    }

    /// Shortest decimal rendering of an amount, as matched by search
    pub fn amount_text(&self, amount: f64) -> String {
        if amount == 0.0 {
            "0".to_string()
        } else {
            amount.to_string()
        }
    }

    /// Amount as shown in the list and summary cards
    pub fn format_amount(&self, amount: f64) -> String {
        format!("${}", self.amount_text(amount))
    }

    /// Whether `needle` (already lowercased) occurs in any searchable field
    pub fn matches_search(&self, transaction: &Transaction, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        transaction.category.to_lowercase().contains(needle)
            || self.amount_text(transaction.amount).to_lowercase().contains(needle)
            || transaction.transaction_type.as_str().contains(needle)
            || self.format_date(transaction.date).to_lowercase().contains(needle)
    }

    /// Format a page of transactions, numbering from `first_number`
    pub fn format_transactions_for_table(
        &self,
        transactions: &[Transaction],
        first_number: usize,
    ) -> Vec<FormattedTransaction> {
        transactions
            .iter()
            .enumerate()
            .map(|(offset, tx)| self.format_single_transaction(tx, first_number + offset))
            .collect()
    }

    /// Format a single transaction for display
    pub fn format_single_transaction(&self, transaction: &Transaction, number: usize) -> FormattedTransaction {
        FormattedTransaction {
            id: transaction.id.clone(),
            number,
            category: transaction.category.clone(),
            formatted_amount: self.format_amount(transaction.amount),
            transaction_type: transaction.transaction_type,
            formatted_date: self.format_date(transaction.date),
        }
    }
}

impl Default for TransactionTableService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_transaction(id: &str, category: &str, amount: f64, date: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            category: category.to_string(),
            amount,
            transaction_type: if amount >= 0.0 { TransactionType::Income } else { TransactionType::Expense },
            date,
        }
    }

    #[test]
    fn test_format_date_default_pattern() {
        let service = TransactionTableService::new();

        assert_eq!(service.format_date(1_700_000_000_000), "Nov 14, 2023, 10:13 PM");
        assert_eq!(service.format_date(1_701_000_000_000), "Nov 26, 2023, 12:00 PM");
    }

    #[test]
    fn test_format_date_with_offset() {
        let config = DateDisplayConfig { utc_offset_minutes: -300, ..DateDisplayConfig::default() };
        let service = TransactionTableService::with_config(&config);

        assert_eq!(service.format_date(1_700_000_000_000), "Nov 14, 2023, 05:13 PM");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = DateDisplayConfig { utc_offset_minutes: 100_000, pattern: "%Q".to_string() };
        let service = TransactionTableService::with_config(&config);

        assert_eq!(service.format_date(1_700_000_000_000), "Nov 14, 2023, 10:13 PM");
    }

    #[test]
    fn test_format_date_out_of_range() {
        let service = TransactionTableService::new();
        assert_eq!(service.format_date(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_amount_text() {
        let service = TransactionTableService::new();

        assert_eq!(service.amount_text(20.0), "20");
        assert_eq!(service.amount_text(1000.5), "1000.5");
        assert_eq!(service.amount_text(-45.25), "-45.25");
        assert_eq!(service.amount_text(-0.0), "0");
        assert_eq!(service.format_amount(20.0), "$20");
    }

    #[test]
    fn test_matches_search_fields() {
        let service = TransactionTableService::new();
        let tx = create_test_transaction("1", "Groceries", -20.5, 1_700_000_000_000);

        assert!(service.matches_search(&tx, ""));
        assert!(service.matches_search(&tx, "groc"));
        assert!(service.matches_search(&tx, "20.5"));
        assert!(service.matches_search(&tx, "expense"));
        assert!(service.matches_search(&tx, "nov 14"));
        assert!(service.matches_search(&tx, "10:13 pm"));
        assert!(!service.matches_search(&tx, "salary"));
        assert!(!service.matches_search(&tx, "income"));
    }

    #[test]
    fn test_search_depends_on_date_pattern() {
        let config = DateDisplayConfig { pattern: "%Y-%m-%d".to_string(), ..DateDisplayConfig::default() };
        let service = TransactionTableService::with_config(&config);
        let tx = create_test_transaction("1", "Food", -20.0, 1_700_000_000_000);

        assert!(service.matches_search(&tx, "2023-11-14"));
        assert!(!service.matches_search(&tx, "nov"));
    }

    #[test]
    fn test_format_transactions_for_table() {
        let service = TransactionTableService::new();
        let transactions = vec![
            create_test_transaction("2", "Salary", 1000.0, 1_701_000_000_000),
            create_test_transaction("1", "Food", -20.0, 1_700_000_000_000),
        ];

        let formatted = service.format_transactions_for_table(&transactions, 6);

        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0].number, 6);
        assert_eq!(formatted[1].number, 7);
        assert_eq!(formatted[0].formatted_amount, "$1000");
        assert_eq!(
            formatted[1].to_line(),
            "7. Category: Food | Amount: $-20 | Type: expense | Date: Nov 14, 2023, 10:13 PM"
        );
    }
}
