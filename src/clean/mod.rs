//! Cleaning stage: raw tables in, validated tables out.
//!
//! Row-level problems are data-quality signals, not faults. Rows that break
//! a rule are dropped silently and the counts are logged; the stage never
//! fails because of malformed content. Transaction cleaning requires the
//! cleaned customer table, which fixes the stage order: customers first.

use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::PipelineConfig;
use crate::models::{Customer, NA, RawCustomer, RawTransaction, Transaction};
use crate::utils::stats::round2;

/// Clean and standardize the customer table.
///
/// Drops rows with a null `customer_id` or a country outside the configured
/// valid set, uppercases `country`, lowercases `email`, and de-duplicates by
/// `customer_id` keeping the first occurrence in input order. The result is
/// sorted by `customer_id`.
#[must_use]
pub fn clean_customers(raw: Vec<RawCustomer>, config: &PipelineConfig) -> Vec<Customer> {
    let initial_rows = raw.len();
    let mut seen_ids = FxHashSet::default();
    let mut duplicates = 0usize;
    let mut cleaned = Vec::with_capacity(initial_rows);

    for row in raw {
        let Some(customer_id) = row.customer_id else {
            continue;
        };
        let Some(country) = row.country.map(|c| c.to_uppercase()) else {
            continue;
        };
        if !config.valid_country_codes.contains(&country) {
            continue;
        }
        if !seen_ids.insert(customer_id) {
            duplicates += 1;
            continue;
        }
        cleaned.push(Customer {
            customer_id,
            country,
            signup_date: row.signup_date,
            email: row.email.map(|e| e.to_lowercase()),
            extra: row.extra,
        });
    }
    cleaned.sort_unstable_by_key(|c| c.customer_id);

    if duplicates > 0 {
        warn!("{duplicates} duplicate customer_ids found, kept first occurrence");
    }
    let removed = initial_rows - cleaned.len();
    if removed > 0 {
        info!(
            "Removed {removed} customer rows ({:.1}% of {initial_rows})",
            removed as f64 / initial_rows as f64 * 100.0
        );
    }
    cleaned
}

/// Clean and standardize the transaction table against an already-cleaned
/// customer table.
///
/// Normalizes `currency`/`category` (null or empty becomes `"NA"`), drops
/// rows with invalid amounts, null keys or an unparseable timestamp,
/// de-duplicates by `transaction_id` (first occurrence wins), removes
/// orphans, optionally infers missing currencies from the owning customer's
/// country, and derives `amount_in_eur`. The result is sorted by
/// `transaction_id`.
#[must_use]
pub fn clean_transactions(
    raw: Vec<RawTransaction>,
    customers: &[Customer],
    config: &PipelineConfig,
) -> Vec<Transaction> {
    let initial_rows = raw.len();
    let valid_customer_ids: FxHashSet<i64> =
        customers.iter().map(|c| c.customer_id).collect();
    let country_by_customer: FxHashMap<i64, &str> = customers
        .iter()
        .map(|c| (c.customer_id, c.country.as_str()))
        .collect();

    let mut seen_ids = FxHashSet::default();
    let mut duplicates = 0usize;
    let mut orphans = 0usize;
    let mut inferred = 0usize;
    let mut cleaned = Vec::with_capacity(initial_rows);

    for row in raw {
        let currency = match row.currency.as_deref() {
            None | Some("") => NA.to_string(),
            Some(c) => c.to_uppercase(),
        };
        let category = match row.category.as_deref() {
            None | Some("") => NA.to_string(),
            Some(c) => c.to_lowercase(),
        };
        let Some(amount) = row.amount.filter(|a| *a > 0.0) else {
            continue;
        };
        let (Some(transaction_id), Some(customer_id), Some(timestamp)) =
            (row.transaction_id, row.customer_id, row.timestamp)
        else {
            continue;
        };
        if !seen_ids.insert(transaction_id) {
            duplicates += 1;
            continue;
        }
        // Orphan check runs against the cleaned customer table, so rows the
        // customer stage dropped take their transactions with them.
        if !valid_customer_ids.contains(&customer_id) {
            orphans += 1;
            continue;
        }

        let currency = if config.infer_missing_currency && currency == NA {
            match country_by_customer
                .get(&customer_id)
                .and_then(|country| config.country_to_currency.get(*country))
            {
                Some(inferred_currency) => {
                    inferred += 1;
                    inferred_currency.clone()
                }
                None => currency,
            }
        } else {
            currency
        };

        let amount_in_eur = round2(amount * config.eur_rate(&currency));
        cleaned.push(Transaction {
            transaction_id,
            customer_id,
            amount,
            currency,
            timestamp,
            category,
            amount_in_eur,
        });
    }
    cleaned.sort_unstable_by_key(|t| t.transaction_id);

    if duplicates > 0 {
        warn!("{duplicates} duplicate transaction_ids found, kept first occurrence");
    }
    if orphans > 0 {
        warn!("{orphans} transactions reference non-existent customers and were removed");
    }
    if inferred > 0 {
        info!("Inferred currency for {inferred} transactions from customer country");
    }
    let removed = initial_rows - cleaned.len();
    if removed > 0 {
        info!(
            "Removed {removed} transaction rows ({:.1}% of {initial_rows})",
            removed as f64 / initial_rows as f64 * 100.0
        );
    }
    cleaned
}
