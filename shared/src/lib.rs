use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated financial record as held by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque identifier, stable across reloads
    pub id: String,
    /// Category label (one of the user's known categories)
    pub category: String,
    /// Signed amount (positive for income, negative for expense)
    pub amount: f64,
    /// Kind of transaction
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Point in time as epoch milliseconds (UTC)
    pub date: i64,
}

impl Transaction {
    /// The transaction date as a UTC timestamp, if it is within chrono's range
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date).single()
    }
}

/// Kind of transaction, used for search matching and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    /// Lowercase label as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: '{}'", other)),
        }
    }
}

/// Transaction identifier as delivered by the data source (string or integer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    /// Canonical string form of the identifier
    pub fn to_id_string(&self) -> String {
        match self {
            RawId::Text(text) => text.clone(),
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Timestamp as delivered by the data source.
///
/// The GraphQL source serialises epoch milliseconds as strings, other sources
/// send plain integers; RFC 3339 text is accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl RawTimestamp {
    /// Epoch milliseconds, or `None` if the value can't be interpreted
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            RawTimestamp::Millis(millis) => Some(*millis),
            RawTimestamp::Fractional(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    Some(*value as i64)
                } else {
                    None
                }
            }
            RawTimestamp::Text(text) => {
                let text = text.trim();
                if let Ok(millis) = text.parse::<i64>() {
                    return Some(millis);
                }
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|date| date.timestamp_millis())
            }
        }
    }
}

/// A transaction record exactly as received; any field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub date: Option<RawTimestamp>,
}

impl From<&Transaction> for RawTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: Some(RawId::Text(transaction.id.clone())),
            category: Some(transaction.category.clone()),
            amount: Some(transaction.amount),
            transaction_type: Some(transaction.transaction_type.as_str().to_string()),
            date: Some(RawTimestamp::Millis(transaction.date)),
        }
    }
}

/// One entry of the snapshot's transaction list.
///
/// Entries whose fields have the wrong JSON type are kept as `Unreadable`
/// instead of failing the whole snapshot, so the client can skip just them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Transaction(RawTransaction),
    Unreadable(serde_json::Value),
}

impl RawRecord {
    /// The record's identifier in canonical string form, if one can be read
    pub fn id(&self) -> Option<String> {
        match self {
            RawRecord::Transaction(raw) => raw.id.as_ref().map(RawId::to_id_string),
            RawRecord::Unreadable(value) => match value.get("id")? {
                serde_json::Value::String(text) => Some(text.clone()),
                serde_json::Value::Number(number) => Some(number.to_string()),
                _ => None,
            },
        }
    }

    /// The typed record, or the reason it can't be read
    pub fn into_raw(self) -> Result<RawTransaction, String> {
        match self {
            RawRecord::Transaction(raw) => Ok(raw),
            RawRecord::Unreadable(value) if !value.is_object() => {
                Err(format!("expected an object, found {}", value))
            }
            RawRecord::Unreadable(value) => serde_json::from_value::<RawTransaction>(value)
                .map_err(|e| e.to_string()),
        }
    }
}

impl From<RawTransaction> for RawRecord {
    fn from(raw: RawTransaction) -> Self {
        RawRecord::Transaction(raw)
    }
}

/// Aggregate totals computed by the data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_balance: f64,
    pub total_income: f64,
    pub total_expenses: f64,
}

/// Snapshot returned by the dashboard query for the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub total_balance: f64,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub transactions: Vec<RawRecord>,
}

impl DashboardData {
    /// The aggregate part of the snapshot
    pub fn totals(&self) -> DashboardTotals {
        DashboardTotals {
            total_balance: self.total_balance,
            total_income: self.total_income,
            total_expenses: self.total_expenses,
        }
    }
}

/// Response after deleting a transaction; echoes the deleted id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteTransactionResponse {
    pub id: String,
}
