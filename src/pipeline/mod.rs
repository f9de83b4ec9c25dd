//! Pipeline orchestration.
//!
//! Wires the collaborators together: read the two raw sources, run the
//! cleaning stage, run the feature-engineering stage, write the three
//! outputs. Each stage is a blocking call over tables held fully in memory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::clean::{clean_customers, clean_transactions};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::compute_customer_features;
use crate::io;
use crate::models::{Customer, CustomerFeatures, Transaction};
use crate::summary::{CustomerSummary, FeatureSummary, TransactionSummary};

/// Input and output locations for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    /// Raw customers CSV
    pub customers: PathBuf,
    /// Raw transactions CSV
    pub transactions: PathBuf,
    /// Directory receiving the three output CSVs
    pub output_dir: PathBuf,
}

impl PipelinePaths {
    /// Conventional layout: `<dir>/customers.csv` and `<dir>/transactions.csv`
    /// in, `<output_dir>` out.
    #[must_use]
    pub fn new(input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            customers: input_dir.join("customers.csv"),
            transactions: input_dir.join("transactions.csv"),
            output_dir: output_dir.to_path_buf(),
        }
    }
}

/// The three tables produced by a pipeline run.
#[derive(Debug)]
pub struct PipelineOutput {
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
    pub features: Vec<CustomerFeatures>,
}

/// Run the full pipeline: clean both tables, derive features, write the
/// three outputs under `paths.output_dir`.
pub fn run_pipeline(paths: &PipelinePaths, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    fs::create_dir_all(&paths.output_dir)?;

    info!("Loading raw data");
    let raw_customers = io::read_customers(&paths.customers)?;
    let raw_transactions = io::read_transactions(&paths.transactions)?;
    info!(
        "Loaded {} customers, {} transactions",
        raw_customers.len(),
        raw_transactions.len()
    );

    info!("Cleaning customers");
    let customers = clean_customers(raw_customers, config);
    log_summary("customer", &CustomerSummary::from_table(&customers));

    info!("Cleaning transactions");
    let transactions = clean_transactions(raw_transactions, &customers, config);
    log_summary("transaction", &TransactionSummary::from_table(&transactions));

    info!("Computing customer features");
    let features = compute_customer_features(&customers, &transactions, config);
    log_summary("feature", &FeatureSummary::from_table(&features));

    io::write_customers(&customers, &paths.output_dir.join("customers_cleaned.csv"))?;
    io::write_transactions(
        &transactions,
        &paths.output_dir.join("transactions_cleaned.csv"),
    )?;
    io::write_features(&features, &paths.output_dir.join("customer_features.csv"))?;

    Ok(PipelineOutput {
        customers,
        transactions,
        features,
    })
}

fn log_summary<T: serde::Serialize>(stage: &str, summary: &T) {
    match serde_json::to_string(summary) {
        Ok(json) => debug!("{stage} summary: {json}"),
        Err(e) => debug!("{stage} summary unavailable: {e}"),
    }
}
