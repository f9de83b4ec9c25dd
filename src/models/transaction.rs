//! Transaction entity models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp_format;

/// A transaction row exactly as read from the raw source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    /// Transaction identifier
    pub transaction_id: Option<i64>,
    /// Identifier of the customer who made the transaction
    pub customer_id: Option<i64>,
    /// Transaction amount in the transaction's own currency
    pub amount: Option<f64>,
    /// Currency code, any casing; may be missing
    pub currency: Option<String>,
    /// Transaction timestamp (`%Y-%m-%d %H:%M:%S`)
    #[serde(with = "timestamp_format::option")]
    pub timestamp: Option<NaiveDateTime>,
    /// Spending category, any casing; may be missing or empty
    pub category: Option<String>,
}

/// A cleaned transaction row.
///
/// Invariants: `transaction_id` is unique within its table, `customer_id`
/// references a row in the cleaned customer table, `amount` is strictly
/// positive, `currency` and `category` are normalized or the `"NA"`
/// placeholder, never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: i64,
    /// Identifier of an existing cleaned customer
    pub customer_id: i64,
    /// Amount in the transaction's currency, strictly positive
    pub amount: f64,
    /// Uppercase currency code, possibly inferred from the customer's
    /// country, or `"NA"`
    pub currency: String,
    /// Transaction timestamp
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// Lowercase spending category, or `"NA"`
    pub category: String,
    /// Amount converted to EUR at the configured rate, rounded to 2 decimals
    pub amount_in_eur: f64,
}
