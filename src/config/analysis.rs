use super::traits::ConfigSection;
use crate::error::StocklensError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Ticker symbols used to map wide OHLCV column names (e.g. "AAPL_Close")
    /// back to bare symbols. Empty means the columns are already symbols.
    pub tickers: Vec<String>,
    /// Annualized risk-free rate used in the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Inclusive analysis window. Unset bounds are open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            risk_free_rate: 0.0,
            start_date: None,
            end_date: None,
        }
    }
}

impl ConfigSection for AnalysisConfig {
    fn section_name() -> &'static str {
        "analysis"
    }

    fn validate(&self) -> Result<(), StocklensError> {
        if !self.risk_free_rate.is_finite() {
            return Err(StocklensError::Configuration(
                "Risk-free rate must be a finite number".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(StocklensError::Configuration(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }
}
