use std::collections::HashSet;

use shared::{RawRecord, RawTransaction, Transaction, TransactionType};
use tracing::warn;

use crate::errors::DashboardError;

/// Result of mapping a batch of wire records
#[derive(Debug, Clone, Default)]
pub struct MappedRecords {
    /// Valid transactions in input order
    pub transactions: Vec<Transaction>,
    /// One `MalformedTransaction` per record left out
    pub skipped: Vec<DashboardError>,
}

pub struct TransactionMapper;

impl TransactionMapper {
    /// Validate a single wire record
    pub fn from_raw(index: usize, raw: RawTransaction) -> Result<Transaction, DashboardError> {
        let malformed = |reason: &str| DashboardError::MalformedTransaction {
            index,
            reason: reason.to_string(),
        };

        let id = raw
            .id
            .map(|id| id.to_id_string())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| malformed("missing id"))?;

        let category = raw
            .category
            .filter(|category| !category.trim().is_empty())
            .ok_or_else(|| malformed("missing category"))?;

        let amount = raw
            .amount
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| malformed("missing or non-finite amount"))?;

        let transaction_type = raw
            .transaction_type
            .ok_or_else(|| malformed("missing type"))?
            .parse::<TransactionType>()
            .map_err(|e| malformed(e.as_str()))?;

        let date = raw
            .date
            .and_then(|date| date.to_millis())
            .ok_or_else(|| malformed("missing or unreadable date"))?;

        Ok(Transaction {
            id,
            category,
            amount,
            transaction_type,
            date,
        })
    }

    /// Read and validate one snapshot entry
    pub fn from_record(index: usize, record: RawRecord) -> Result<Transaction, DashboardError> {
        let raw = record
            .into_raw()
            .map_err(|reason| DashboardError::MalformedTransaction { index, reason })?;
        Self::from_raw(index, raw)
    }

    /// Validate a batch of wire records, skipping (and logging) malformed ones.
    ///
    /// A record whose id was already seen earlier in the batch is skipped.
    pub fn map_records(records: Vec<RawRecord>) -> MappedRecords {
        let mut mapped = MappedRecords::default();
        let mut seen_ids = HashSet::new();

        for (index, record) in records.into_iter().enumerate() {
            let result = Self::from_record(index, record).and_then(|transaction| {
                if seen_ids.insert(transaction.id.clone()) {
                    Ok(transaction)
                } else {
                    Err(DashboardError::MalformedTransaction {
                        index,
                        reason: format!("duplicate id '{}'", transaction.id),
                    })
                }
            });

            match result {
                Ok(transaction) => mapped.transactions.push(transaction),
                Err(error) => {
                    warn!("{}", error);
                    mapped.skipped.push(error);
                }
            }
        }

        mapped
    }

    /// De-duplicate category names, keeping first-seen order
    pub fn map_categories(categories: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        categories
            .into_iter()
            .filter(|category| seen.insert(category.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{RawId, RawTimestamp};

    fn create_raw(id: &str) -> RawTransaction {
        RawTransaction {
            id: Some(RawId::Text(id.to_string())),
            category: Some("Food".to_string()),
            amount: Some(20.0),
            transaction_type: Some("expense".to_string()),
            date: Some(RawTimestamp::Text("1700000000000".to_string())),
        }
    }

    fn skipped_reason(raw: RawTransaction) -> String {
        match TransactionMapper::from_raw(0, raw) {
            Err(DashboardError::MalformedTransaction { reason, .. }) => reason,
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_from_raw_valid() {
        let transaction = TransactionMapper::from_raw(0, create_raw("t1")).unwrap();

        assert_eq!(transaction.id, "t1");
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.amount, 20.0);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.date, 1_700_000_000_000);
    }

    #[test]
    fn test_from_raw_numeric_id() {
        let raw = RawTransaction { id: Some(RawId::Number(7)), ..create_raw("ignored") };
        assert_eq!(TransactionMapper::from_raw(0, raw).unwrap().id, "7");
    }

    #[test]
    fn test_from_raw_missing_fields() {
        assert_eq!(skipped_reason(RawTransaction { id: None, ..create_raw("t1") }), "missing id");
        assert_eq!(
            skipped_reason(RawTransaction { category: Some("  ".to_string()), ..create_raw("t1") }),
            "missing category"
        );
        assert_eq!(
            skipped_reason(RawTransaction { amount: Some(f64::NAN), ..create_raw("t1") }),
            "missing or non-finite amount"
        );
        assert_eq!(
            skipped_reason(RawTransaction { transaction_type: None, ..create_raw("t1") }),
            "missing type"
        );
        assert_eq!(
            skipped_reason(RawTransaction { date: Some(RawTimestamp::Text("soon".to_string())), ..create_raw("t1") }),
            "missing or unreadable date"
        );
    }

    #[test]
    fn test_from_raw_unknown_type() {
        let raw = RawTransaction { transaction_type: Some("transfer".to_string()), ..create_raw("t1") };
        assert!(skipped_reason(raw).contains("transfer"));
    }

    #[test]
    fn test_map_records_counts_skipped() {
        let raws = vec![
            create_raw("t1").into(),
            RawTransaction { category: None, ..create_raw("t2") }.into(),
            create_raw("t3").into(),
            create_raw("t1").into(),
        ];

        let mapped = TransactionMapper::map_records(raws);

        let ids: Vec<&str> = mapped.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert_eq!(mapped.skipped.len(), 2);
        assert!(matches!(
            mapped.skipped[0],
            DashboardError::MalformedTransaction { index: 1, .. }
        ));
        assert!(matches!(
            mapped.skipped[1],
            DashboardError::MalformedTransaction { index: 3, .. }
        ));
    }

    #[test]
    fn test_map_records_skips_unreadable_entries() {
        let json = r#"[
            {"id": "t1", "category": "Food", "amount": 20, "type": "expense", "date": 1700000000000},
            {"id": "t2", "category": "Food", "amount": "oops", "type": "expense", "date": 1700000000000},
            {"id": "t3", "category": "Rent", "amount": 50, "type": "expense", "date": 1700000000000}
        ]"#;
        let records: Vec<RawRecord> = serde_json::from_str(json).unwrap();

        let mapped = TransactionMapper::map_records(records);

        let ids: Vec<&str> = mapped.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
        assert_eq!(mapped.skipped.len(), 1);
        assert!(matches!(
            &mapped.skipped[0],
            DashboardError::MalformedTransaction { index: 1, reason } if reason.contains("oops")
        ));
    }

    #[test]
    fn test_map_categories_dedup() {
        let categories = vec!["Food".to_string(), "Rent".to_string(), "Food".to_string()];
        assert_eq!(TransactionMapper::map_categories(categories), vec!["Food", "Rent"]);
    }
}
