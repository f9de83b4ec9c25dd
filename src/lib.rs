//! A Rust pipeline for cleaning Nordic customer and transaction data and
//! deriving per-customer behavioral features (RFM metrics and business
//! flags).
//!
//! The crate is organized around two pure stages over in-memory tables:
//! [`clean`] turns noisy raw tables into a validated, referentially
//! consistent pair, and [`features`] collapses the cleaned transactions into
//! one aggregate row per customer. [`pipeline::run_pipeline`] wires them to
//! the CSV collaborators in [`io`].

pub mod clean;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod summary;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use models::{Customer, CustomerFeatures, RawCustomer, RawTransaction, Transaction};

// Stage entry points
pub use clean::{clean_customers, clean_transactions};
pub use features::compute_customer_features;
pub use pipeline::{PipelineOutput, PipelinePaths, run_pipeline};

// Data-quality summaries
pub use summary::{CustomerSummary, FeatureSummary, TransactionSummary};
