//! CSV read/write collaborators.
//!
//! The transform stages are pure functions over in-memory tables; this
//! module is the only place that touches the filesystem. File handles are
//! scoped to each call and closed on every exit path.
//!
//! Customer sources may carry columns the pipeline does not interpret;
//! those are captured per row and written back out unchanged. Transaction
//! sources are read through serde and any extra columns are ignored.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use log::info;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::models::{Customer, CustomerFeatures, RawCustomer, RawTransaction, Transaction};

/// Columns a customer source must carry.
const CUSTOMER_COLUMNS: [&str; 4] = ["customer_id", "country", "signup_date", "email"];
/// Columns a transaction source must carry.
const TRANSACTION_COLUMNS: [&str; 6] = [
    "transaction_id",
    "customer_id",
    "amount",
    "currency",
    "timestamp",
    "category",
];

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PipelineError::MissingInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Check the header row against the mandatory column set; a source missing
/// one is an irrecoverable shape problem, not bad row content.
fn check_columns(headers: &StringRecord, mandatory: &[&str], path: &Path) -> Result<()> {
    for column in mandatory {
        if !headers.iter().any(|h| h == *column) {
            return Err(PipelineError::MissingColumn {
                path: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Read the raw customer source. Empty fields deserialize to `None`;
/// columns outside the known set are collected into each row's `extra` map.
pub fn read_customers(path: &Path) -> Result<Vec<RawCustomer>> {
    let file = open_source(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    check_columns(&headers, &CUSTOMER_COLUMNS, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: RawCustomer = record.deserialize(Some(&headers))?;
        row.extra = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !CUSTOMER_COLUMNS.contains(header))
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(PipelineError::EmptySource(path.to_path_buf()));
    }
    Ok(rows)
}

/// Read the raw transaction source. Empty fields deserialize to `None`;
/// columns beyond the mandatory set are ignored.
pub fn read_transactions(path: &Path) -> Result<Vec<RawTransaction>> {
    let file = open_source(path)?;
    let mut reader = csv::Reader::from_reader(file);
    check_columns(&reader.headers()?.clone(), &TRANSACTION_COLUMNS, path)?;

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<RawTransaction>, csv::Error>>()?;
    if rows.is_empty() {
        return Err(PipelineError::EmptySource(path.to_path_buf()));
    }
    Ok(rows)
}

/// Write the cleaned customer table, known columns first and pass-through
/// columns after them in name order.
pub fn write_customers(rows: &[Customer], path: &Path) -> Result<()> {
    let extra_columns: Vec<&str> = rows
        .first()
        .map(|c| c.extra.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CUSTOMER_COLUMNS.iter().copied().chain(extra_columns.iter().copied()))?;
    for row in rows {
        let mut record = StringRecord::new();
        record.push_field(&row.customer_id.to_string());
        record.push_field(&row.country);
        record.push_field(
            &row.signup_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        );
        record.push_field(row.email.as_deref().unwrap_or_default());
        for column in &extra_columns {
            record.push_field(row.extra.get(*column).map(String::as_str).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_table<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write the cleaned transaction table.
pub fn write_transactions(rows: &[Transaction], path: &Path) -> Result<()> {
    write_table(rows, path)
}

/// Write the customer feature table.
pub fn write_features(rows: &[CustomerFeatures], path: &Path) -> Result<()> {
    write_table(rows, path)
}
