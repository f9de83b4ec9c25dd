//! Per-customer feature record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::timestamp_format;

/// One row of the customer feature table.
///
/// Produced only for customers with at least one cleaned transaction.
/// Monetary aggregates are over `amount_in_eur` and rounded to 2 decimals.
/// The interevent statistics are `None` when the customer has too few
/// transactions for them to be defined; they are never coerced to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerFeatures {
    /// Customer identifier
    pub customer_id: i64,
    /// Email from the cleaned customer row
    pub email: Option<String>,
    /// Country from the cleaned customer row
    pub country: String,
    /// Signup date from the cleaned customer row
    pub signup_date: Option<NaiveDate>,

    // Monetary
    /// Sum of EUR amounts
    pub total_spend: f64,
    /// Mean EUR amount
    pub avg_transaction_amount: f64,
    /// Sample standard deviation of EUR amounts; 0.0 for a single transaction
    pub std_transaction_amount: f64,
    /// Smallest EUR amount
    pub min_transaction_amount: f64,
    /// Largest EUR amount
    pub max_transaction_amount: f64,

    // Frequency
    /// Number of cleaned transactions
    pub transaction_count: u64,

    // Recency
    /// Timestamp of the earliest transaction
    #[serde(with = "timestamp_format")]
    pub first_transaction_date: NaiveDateTime,
    /// Timestamp of the latest transaction
    #[serde(with = "timestamp_format")]
    pub last_transaction_date: NaiveDateTime,
    /// Whole days from the last transaction to the table-wide reference date
    pub days_since_last_transaction: i64,
    /// Whole days between first and last transaction; 0 for a single one
    pub customer_tenure_days: i64,

    // Interevent statistics
    /// Mean of consecutive-transaction gaps in days; `None` without gaps
    pub mean_interevent_days: Option<f64>,
    /// Sample standard deviation of the gaps; `None` with fewer than two gaps
    pub std_interevent_days: Option<f64>,

    // Preferences
    /// Most frequent category; ties resolved to the first category, in
    /// transaction order, reaching the winning count
    pub preferred_category: String,
    /// Most frequent currency; same tie-break rule
    pub preferred_currency: String,

    // Flags
    /// Total spend at or above the configured percentile of all customers
    pub is_high_value: bool,
    /// Inactive for more than the configured number of days
    pub is_churning: bool,
    /// Inactive for longer than mean + multiplier x std of the customer's
    /// own interevent gaps; false when those statistics are undefined
    pub is_churning_2: bool,
    /// Exactly one cleaned transaction
    pub has_single_transaction: bool,
}
