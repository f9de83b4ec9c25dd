//! Tests for the cleaning stage.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use nordic_pipeline::models::{RawCustomer, RawTransaction};
use nordic_pipeline::{PipelineConfig, clean_customers, clean_transactions};

fn raw_customer(id: Option<i64>, country: &str, email: Option<&str>) -> RawCustomer {
    RawCustomer {
        customer_id: id,
        country: Some(country.to_string()),
        signup_date: NaiveDate::from_ymd_opt(2023, 5, 1),
        email: email.map(String::from),
        extra: BTreeMap::new(),
    }
}

fn ts(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
    Some(
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

fn raw_transaction(
    id: Option<i64>,
    customer_id: Option<i64>,
    amount: Option<f64>,
    currency: Option<&str>,
) -> RawTransaction {
    RawTransaction {
        transaction_id: id,
        customer_id,
        amount,
        currency: currency.map(String::from),
        timestamp: ts(2024, 3, 15),
        category: Some("Food".to_string()),
    }
}

#[test]
fn customer_cleaning_normalizes_dedupes_and_filters() {
    let raw = vec![
        raw_customer(Some(1), "dk", Some("A@X.com")),
        raw_customer(Some(1), "DK", Some("dup@x.com")),
        raw_customer(Some(2), "US", None),
    ];
    let cleaned = clean_customers(raw, &PipelineConfig::default());

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].customer_id, 1);
    assert_eq!(cleaned[0].country, "DK");
    assert_eq!(cleaned[0].email.as_deref(), Some("a@x.com"));
}

#[test]
fn customers_with_null_id_are_dropped() {
    let raw = vec![
        raw_customer(None, "SE", None),
        raw_customer(Some(7), "se", None),
    ];
    let cleaned = clean_customers(raw, &PipelineConfig::default());
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].customer_id, 7);
    assert_eq!(cleaned[0].country, "SE");
}

#[test]
fn duplicate_customers_keep_first_in_input_order() {
    let raw = vec![
        raw_customer(Some(3), "NO", Some("first@x.com")),
        raw_customer(Some(3), "NO", Some("second@x.com")),
        raw_customer(Some(3), "NO", Some("third@x.com")),
    ];
    let cleaned = clean_customers(raw, &PipelineConfig::default());
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].email.as_deref(), Some("first@x.com"));
}

#[test]
fn customer_cleaning_is_idempotent() {
    let raw = vec![
        raw_customer(Some(2), "fi", Some("B@Y.com")),
        raw_customer(Some(1), "dk", Some("A@X.com")),
        raw_customer(None, "dk", None),
    ];
    let config = PipelineConfig::default();
    let once = clean_customers(raw, &config);
    let again = clean_customers(
        once.iter()
            .map(|c| RawCustomer {
                customer_id: Some(c.customer_id),
                country: Some(c.country.clone()),
                signup_date: c.signup_date,
                email: c.email.clone(),
                extra: c.extra.clone(),
            })
            .collect(),
        &config,
    );
    assert_eq!(once, again);
}

#[test]
fn transaction_cleaning_is_idempotent() {
    // Re-running cleaning over its own output must change nothing: inferred
    // currencies are no longer "NA" and amount_in_eur recomputes identically.
    let config = PipelineConfig::default();
    let customers = clean_customers(vec![raw_customer(Some(1), "dk", None)], &config);
    let raw = vec![
        raw_transaction(Some(1), Some(1), Some(100.0), None),
        raw_transaction(Some(2), Some(1), Some(50.0), Some("eur")),
        raw_transaction(Some(3), Some(1), Some(-1.0), Some("EUR")),
    ];
    let once = clean_transactions(raw, &customers, &config);
    let again = clean_transactions(
        once.iter()
            .map(|t| RawTransaction {
                transaction_id: Some(t.transaction_id),
                customer_id: Some(t.customer_id),
                amount: Some(t.amount),
                currency: Some(t.currency.clone()),
                timestamp: Some(t.timestamp),
                category: Some(t.category.clone()),
            })
            .collect(),
        &customers,
        &config,
    );
    assert_eq!(once, again);
}

#[test]
fn uninterpreted_customer_columns_pass_through() {
    let mut raw = raw_customer(Some(1), "dk", Some("A@X.com"));
    raw.extra
        .insert("loyalty_tier".to_string(), "Gold".to_string());
    let cleaned = clean_customers(vec![raw], &PipelineConfig::default());

    assert_eq!(cleaned[0].extra["loyalty_tier"], "Gold");
}

#[test]
fn transaction_cleaning_drops_invalid_amounts_and_orphans() {
    // Worked example: negative amount dropped, orphan dropped, null currency
    // kept as "NA" when inference is off.
    let customers = clean_customers(
        vec![raw_customer(Some(1), "dk", None)],
        &PipelineConfig::default(),
    );
    let raw = vec![
        raw_transaction(Some(10), Some(1), Some(-5.0), Some("EUR")),
        raw_transaction(Some(11), Some(1), Some(100.0), None),
        raw_transaction(Some(12), Some(99), Some(50.0), Some("EUR")),
    ];
    let config = PipelineConfig {
        infer_missing_currency: false,
        ..PipelineConfig::default()
    };
    let cleaned = clean_transactions(raw, &customers, &config);

    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].transaction_id, 11);
    assert_eq!(cleaned[0].customer_id, 1);
    assert_eq!(cleaned[0].currency, "NA");
    // "NA" converts at the configured default rate of 1.0
    assert_eq!(cleaned[0].amount_in_eur, 100.0);
}

#[test]
fn missing_currency_is_inferred_from_customer_country() {
    let customers = clean_customers(
        vec![raw_customer(Some(1), "dk", None)],
        &PipelineConfig::default(),
    );
    let raw = vec![raw_transaction(Some(11), Some(1), Some(100.0), None)];
    let cleaned = clean_transactions(raw, &customers, &PipelineConfig::default());

    assert_eq!(cleaned[0].currency, "DKK");
    assert_eq!(cleaned[0].amount_in_eur, 13.4);
}

#[test]
fn inference_miss_keeps_na_placeholder() {
    let customers = clean_customers(
        vec![raw_customer(Some(1), "dk", None)],
        &PipelineConfig::default(),
    );
    let mut config = PipelineConfig::default();
    config.country_to_currency.remove("DK");
    let raw = vec![raw_transaction(Some(11), Some(1), Some(100.0), None)];
    let cleaned = clean_transactions(raw, &customers, &config);

    assert_eq!(cleaned[0].currency, "NA");
    assert_eq!(cleaned[0].amount_in_eur, 100.0);
}

#[test]
fn currency_and_category_are_normalized() {
    let customers = clean_customers(
        vec![raw_customer(Some(1), "se", None)],
        &PipelineConfig::default(),
    );
    let mut raw = raw_transaction(Some(1), Some(1), Some(10.0), Some("sek"));
    raw.category = Some("GROCERIES".to_string());
    let mut empty_category = raw_transaction(Some(2), Some(1), Some(10.0), Some("SEK"));
    empty_category.category = Some(String::new());

    let cleaned = clean_transactions(
        vec![raw, empty_category],
        &customers,
        &PipelineConfig::default(),
    );
    assert_eq!(cleaned[0].currency, "SEK");
    assert_eq!(cleaned[0].category, "groceries");
    assert_eq!(cleaned[1].category, "NA");
}

#[test]
fn duplicate_transactions_keep_first_in_input_order() {
    let customers = clean_customers(
        vec![raw_customer(Some(1), "dk", None)],
        &PipelineConfig::default(),
    );
    let raw = vec![
        raw_transaction(Some(5), Some(1), Some(10.0), Some("EUR")),
        raw_transaction(Some(5), Some(1), Some(99.0), Some("EUR")),
    ];
    let cleaned = clean_transactions(raw, &customers, &PipelineConfig::default());
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].amount, 10.0);
}

#[test]
fn transactions_without_timestamp_or_keys_are_dropped() {
    let customers = clean_customers(
        vec![raw_customer(Some(1), "dk", None)],
        &PipelineConfig::default(),
    );
    let mut no_timestamp = raw_transaction(Some(1), Some(1), Some(10.0), Some("EUR"));
    no_timestamp.timestamp = None;
    let raw = vec![
        no_timestamp,
        raw_transaction(None, Some(1), Some(10.0), Some("EUR")),
        raw_transaction(Some(3), None, Some(10.0), Some("EUR")),
        raw_transaction(Some(4), Some(1), None, Some("EUR")),
        raw_transaction(Some(5), Some(1), Some(10.0), Some("EUR")),
    ];
    let cleaned = clean_transactions(raw, &customers, &PipelineConfig::default());
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].transaction_id, 5);
}

#[test]
fn cleaned_tables_satisfy_their_invariants() {
    let config = PipelineConfig::default();
    let customers = clean_customers(
        vec![
            raw_customer(Some(2), "no", Some("N@x.com")),
            raw_customer(Some(1), "dk", None),
            raw_customer(Some(2), "no", None),
            raw_customer(Some(9), "de", None),
        ],
        &config,
    );
    let transactions = clean_transactions(
        vec![
            raw_transaction(Some(1), Some(1), Some(10.0), Some("DKK")),
            raw_transaction(Some(2), Some(2), Some(20.0), None),
            raw_transaction(Some(3), Some(9), Some(30.0), Some("EUR")),
            raw_transaction(Some(4), Some(2), Some(0.0), Some("EUR")),
        ],
        &customers,
        &config,
    );

    let ids: Vec<i64> = customers.iter().map(|c| c.customer_id).collect();
    assert_eq!(ids, vec![1, 2]);
    for c in &customers {
        assert!(config.valid_country_codes.contains(&c.country));
    }
    for t in &transactions {
        assert!(t.amount > 0.0);
        assert!(ids.contains(&t.customer_id));
        assert!(!t.currency.is_empty());
        assert!(!t.category.is_empty());
    }
    // customer 9 had country DE and was dropped, taking transaction 3 along
    assert_eq!(transactions.len(), 2);
}
