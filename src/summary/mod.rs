//! Post-stage data-quality summaries.
//!
//! Each stage's output can be collapsed into a small summary value that the
//! pipeline logs after the stage completes. Summaries are descriptive only;
//! they never influence the transforms.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::Serialize;

use crate::models::{Customer, CustomerFeatures, NA, Transaction};
use crate::utils::stats::{mean, round2};

/// Quality metrics for a cleaned customer table.
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub total_customers: usize,
    /// Row count per country, in country order
    pub country_distribution: BTreeMap<String, usize>,
    pub earliest_signup: Option<NaiveDate>,
    pub latest_signup: Option<NaiveDate>,
    pub null_emails: usize,
}

impl CustomerSummary {
    #[must_use]
    pub fn from_table(customers: &[Customer]) -> Self {
        Self {
            total_customers: customers.len(),
            country_distribution: customers
                .iter()
                .map(|c| c.country.clone())
                .counts()
                .into_iter()
                .collect(),
            earliest_signup: customers.iter().filter_map(|c| c.signup_date).min(),
            latest_signup: customers.iter().filter_map(|c| c.signup_date).max(),
            null_emails: customers.iter().filter(|c| c.email.is_none()).count(),
        }
    }
}

/// Quality metrics for a cleaned transaction table.
#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    pub total_transactions: usize,
    pub unique_customers: usize,
    pub currency_distribution: BTreeMap<String, usize>,
    pub category_distribution: BTreeMap<String, usize>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub mean_amount: Option<f64>,
    pub earliest_timestamp: Option<NaiveDateTime>,
    pub latest_timestamp: Option<NaiveDateTime>,
    /// Rows whose currency stayed at the `"NA"` placeholder
    pub na_currency_count: usize,
    /// Rows whose category stayed at the `"NA"` placeholder
    pub na_category_count: usize,
}

impl TransactionSummary {
    #[must_use]
    pub fn from_table(transactions: &[Transaction]) -> Self {
        let amounts: Vec<f64> = transactions.iter().map(|t| t.amount).collect();
        Self {
            total_transactions: transactions.len(),
            unique_customers: transactions.iter().map(|t| t.customer_id).unique().count(),
            currency_distribution: transactions
                .iter()
                .map(|t| t.currency.clone())
                .counts()
                .into_iter()
                .collect(),
            category_distribution: transactions
                .iter()
                .map(|t| t.category.clone())
                .counts()
                .into_iter()
                .collect(),
            min_amount: amounts.iter().copied().reduce(f64::min).map(round2),
            max_amount: amounts.iter().copied().reduce(f64::max).map(round2),
            mean_amount: mean(&amounts).map(round2),
            earliest_timestamp: transactions.iter().map(|t| t.timestamp).min(),
            latest_timestamp: transactions.iter().map(|t| t.timestamp).max(),
            na_currency_count: transactions.iter().filter(|t| t.currency == NA).count(),
            na_category_count: transactions.iter().filter(|t| t.category == NA).count(),
        }
    }
}

/// Headline numbers for a computed feature table.
#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    pub total_customers: usize,
    pub high_value_customers: usize,
    pub churning_customers: usize,
    pub churning_customers_zscore: usize,
    pub single_transaction_customers: usize,
    pub min_total_spend: Option<f64>,
    pub max_total_spend: Option<f64>,
    pub mean_total_spend: Option<f64>,
}

impl FeatureSummary {
    #[must_use]
    pub fn from_table(features: &[CustomerFeatures]) -> Self {
        let spends: Vec<f64> = features.iter().map(|f| f.total_spend).collect();
        Self {
            total_customers: features.len(),
            high_value_customers: features.iter().filter(|f| f.is_high_value).count(),
            churning_customers: features.iter().filter(|f| f.is_churning).count(),
            churning_customers_zscore: features.iter().filter(|f| f.is_churning_2).count(),
            single_transaction_customers: features
                .iter()
                .filter(|f| f.has_single_transaction)
                .count(),
            min_total_spend: spends.iter().copied().reduce(f64::min),
            max_total_spend: spends.iter().copied().reduce(f64::max),
            mean_total_spend: mean(&spends).map(round2),
        }
    }
}
