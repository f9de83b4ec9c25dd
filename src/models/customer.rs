//! Customer entity models.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

/// A customer row exactly as read from the raw source. Every field is
/// optional; cleaning decides what survives. Columns beyond the known four
/// land in `extra` and ride along untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCustomer {
    /// Customer identifier
    pub customer_id: Option<i64>,
    /// Two-letter country code, any casing
    pub country: Option<String>,
    /// Signup date, passed through unchanged
    pub signup_date: Option<NaiveDate>,
    /// Email address, any casing
    pub email: Option<String>,
    /// Values of source columns the pipeline does not interpret, keyed by
    /// column name
    #[serde(skip)]
    pub extra: BTreeMap<String, String>,
}

/// A cleaned customer row.
///
/// Invariants: `customer_id` is unique within its table, `country` is
/// uppercase and a member of the configured valid set, `email` is lowercase.
/// `extra` carries any additional source columns through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Unique customer identifier
    pub customer_id: i64,
    /// Uppercase country code from the configured valid set
    pub country: String,
    /// Signup date, if present in the source
    pub signup_date: Option<NaiveDate>,
    /// Lowercased email address; format is not validated
    pub email: Option<String>,
    /// Uninterpreted source columns, passed through untouched
    pub extra: BTreeMap<String, String>,
}
