//! Feature-engineering stage: one aggregate row per transacting customer.
//!
//! Pass 1 groups the cleaned transactions by customer and computes the RFM
//! aggregates and interevent statistics. Pass 2 derives the fields that need
//! the whole table: the recency reference date, the high-value percentile
//! threshold and the churn flags. Output rows are sorted by `customer_id`
//! so repeated runs over the same input are byte-identical.

use chrono::NaiveDateTime;
use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;

use crate::config::PipelineConfig;
use crate::models::{Customer, CustomerFeatures, Transaction};
use crate::utils::stats::{mean, percentile, round2, sample_std};

/// Aggregates from pass 1 that pass 2 still needs.
struct AggregatedGroup {
    features: CustomerFeatures,
    last_transaction: NaiveDateTime,
}

/// Compute the customer feature table from the cleaned tables.
///
/// Customers without any cleaned transaction produce no row. Returns an
/// empty table when there are no transactions at all.
#[must_use]
pub fn compute_customer_features(
    customers: &[Customer],
    transactions: &[Transaction],
    config: &PipelineConfig,
) -> Vec<CustomerFeatures> {
    let Some(reference_date) = transactions.iter().map(|t| t.timestamp).max() else {
        info!("No transactions; feature table is empty");
        return Vec::new();
    };
    let customer_by_id: FxHashMap<i64, &Customer> =
        customers.iter().map(|c| (c.customer_id, c)).collect();

    // Pass 1: per-customer aggregation.
    let groups = transactions
        .iter()
        .map(|t| (t.customer_id, t))
        .into_group_map();
    let aggregated: Vec<AggregatedGroup> = groups
        .into_iter()
        .filter_map(|(customer_id, group)| {
            let customer = customer_by_id.get(&customer_id)?;
            Some(aggregate_group(customer, &group))
        })
        .collect();

    // Pass 2: table-wide derivations.
    let spends: Vec<f64> = aggregated.iter().map(|g| g.features.total_spend).collect();
    let high_value_threshold =
        percentile(&spends, config.high_value_percentile).unwrap_or_default();

    let mut features: Vec<CustomerFeatures> = aggregated
        .into_iter()
        .map(|g| finalize_flags(g, reference_date, high_value_threshold, config))
        .collect();
    features.sort_unstable_by_key(|f| f.customer_id);

    info!(
        "Computed features for {} customers (high-value threshold {high_value_threshold:.2} EUR)",
        features.len()
    );
    features
}

/// Aggregate one customer's transactions. Flag fields that need table-wide
/// context are left at their defaults for pass 2.
fn aggregate_group(customer: &Customer, group: &[&Transaction]) -> AggregatedGroup {
    let amounts: Vec<f64> = group.iter().map(|t| t.amount_in_eur).collect();
    let total_spend = round2(amounts.iter().sum());
    let avg = mean(&amounts).unwrap_or_default();
    let min = amounts.iter().copied().fold(f64::INFINITY, f64::min);
    let max = amounts.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut timestamps: Vec<NaiveDateTime> = group.iter().map(|t| t.timestamp).collect();
    timestamps.sort_unstable();
    let first = timestamps[0];
    let last = timestamps[timestamps.len() - 1];
    let gaps: Vec<f64> = timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();

    let features = CustomerFeatures {
        customer_id: customer.customer_id,
        email: customer.email.clone(),
        country: customer.country.clone(),
        signup_date: customer.signup_date,
        total_spend,
        avg_transaction_amount: round2(avg),
        std_transaction_amount: round2(sample_std(&amounts).unwrap_or_default()),
        min_transaction_amount: min,
        max_transaction_amount: max,
        transaction_count: group.len() as u64,
        first_transaction_date: first,
        last_transaction_date: last,
        days_since_last_transaction: 0,
        customer_tenure_days: (last.date() - first.date()).num_days(),
        mean_interevent_days: mean(&gaps),
        std_interevent_days: sample_std(&gaps),
        preferred_category: mode_first(group.iter().map(|t| t.category.as_str())),
        preferred_currency: mode_first(group.iter().map(|t| t.currency.as_str())),
        is_high_value: false,
        is_churning: false,
        is_churning_2: false,
        has_single_transaction: group.len() == 1,
    };
    AggregatedGroup {
        features,
        last_transaction: last,
    }
}

/// Fill in the pass-2 fields of one aggregated row.
fn finalize_flags(
    group: AggregatedGroup,
    reference_date: NaiveDateTime,
    high_value_threshold: f64,
    config: &PipelineConfig,
) -> CustomerFeatures {
    let mut f = group.features;
    let days_since = (reference_date.date() - group.last_transaction.date()).num_days();
    f.days_since_last_transaction = days_since;
    // Boundary is inclusive: spend exactly at the threshold counts.
    f.is_high_value = f.total_spend >= high_value_threshold;
    f.is_churning = days_since > config.churn_days_threshold;
    f.is_churning_2 = match (f.mean_interevent_days, f.std_interevent_days) {
        (Some(m), Some(s)) => days_since as f64 > m + config.churn_zscore_multiplier * s,
        // Not enough history for a personal baseline; never flag.
        _ => false,
    };
    f
}

/// Most frequent value; on a tie, the value whose first appearance comes
/// earliest in iteration order wins.
fn mode_first<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for (idx, value) in values.enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(value, _)| value.to_string())
        .unwrap_or_default()
}
