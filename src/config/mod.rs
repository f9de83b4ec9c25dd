//! Configuration for the pipeline.
//!
//! All thresholds, mappings and toggles live in a single value object that is
//! passed explicitly into both stages. There is no global state; two calls
//! with different configs over the same raw tables are independent.

use std::fs::File;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Configuration for the cleaning and feature-engineering stages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Country codes accepted by customer cleaning
    pub valid_country_codes: FxHashSet<String>,
    /// Country code -> currency code, used to infer missing currencies
    pub country_to_currency: FxHashMap<String, String>,
    /// Currency code -> EUR conversion multiplier
    pub currency_to_eur_rate: FxHashMap<String, f64>,
    /// Rate applied to currencies absent from `currency_to_eur_rate`,
    /// including the `"NA"` placeholder
    pub default_eur_rate: f64,
    /// Whether to infer missing currency from the customer's country
    pub infer_missing_currency: bool,
    /// Percentile of total spend above which a customer is high-value
    pub high_value_percentile: f64,
    /// Days of inactivity after which a customer counts as churning
    pub churn_days_threshold: i64,
    /// Standard deviations above mean interevent time for the personalized
    /// churn flag
    pub churn_zscore_multiplier: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let valid_country_codes = ["DK", "FI", "SE", "NO"]
            .into_iter()
            .map(String::from)
            .collect();
        let country_to_currency = [("DK", "DKK"), ("SE", "SEK"), ("NO", "NOK"), ("FI", "EUR")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let currency_to_eur_rate = [("EUR", 1.0), ("DKK", 0.134), ("SEK", 0.094), ("NOK", 0.087)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            valid_country_codes,
            country_to_currency,
            currency_to_eur_rate,
            default_eur_rate: 1.0,
            infer_missing_currency: true,
            high_value_percentile: 0.80,
            churn_days_threshold: 50,
            churn_zscore_multiplier: 2.0,
        }
    }
}

impl PipelineConfig {
    /// Load configuration overrides from a JSON file. Parameters absent from
    /// the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| PipelineError::MissingInput {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is internally usable.
    pub fn validate(&self) -> Result<()> {
        if self.valid_country_codes.is_empty() {
            return Err(PipelineError::Config(
                "valid_country_codes must not be empty".to_string(),
            ));
        }
        if !(self.high_value_percentile > 0.0 && self.high_value_percentile < 1.0) {
            return Err(PipelineError::Config(format!(
                "high_value_percentile must lie in (0, 1), got {}",
                self.high_value_percentile
            )));
        }
        if self.churn_days_threshold < 0 {
            return Err(PipelineError::Config(format!(
                "churn_days_threshold must be non-negative, got {}",
                self.churn_days_threshold
            )));
        }
        if self.churn_zscore_multiplier < 0.0 {
            return Err(PipelineError::Config(format!(
                "churn_zscore_multiplier must be non-negative, got {}",
                self.churn_zscore_multiplier
            )));
        }
        if !self.default_eur_rate.is_finite() {
            return Err(PipelineError::Config(
                "default_eur_rate must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// EUR conversion rate for a currency code, falling back to the
    /// configured default for unmapped codes and the `"NA"` placeholder.
    #[must_use]
    pub fn eur_rate(&self, currency: &str) -> f64 {
        self.currency_to_eur_rate
            .get(currency)
            .copied()
            .unwrap_or(self.default_eur_rate)
    }
}
