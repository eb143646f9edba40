// src/engines/metrics/engine.rs
use super::{column_names, CorrelationMetrics, ReturnMetrics, RiskMetrics};
use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

/// Everything the engine derives from one price table.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub daily_returns: DataFrame,
    pub cumulative_returns: DataFrame,
    pub annualized_volatility: HashMap<String, f64>,
    pub correlation: DataFrame,
    pub sharpe: HashMap<String, f64>,
}

impl AnalysisReport {
    /// Per-ticker volatility and Sharpe ratio as a printable table, ordered
    /// like the input columns.
    pub fn key_metrics(&self) -> Result<DataFrame> {
        let names = column_names(&self.daily_returns);
        let volatility: Vec<f64> = names
            .iter()
            .map(|name| *self.annualized_volatility.get(name).unwrap_or(&f64::NAN))
            .collect();
        let sharpe: Vec<f64> = names
            .iter()
            .map(|name| *self.sharpe.get(name).unwrap_or(&f64::NAN))
            .collect();

        Ok(DataFrame::new(vec![
            Column::new("ticker".into(), names),
            Column::new("annualized_volatility".into(), volatility),
            Column::new("sharpe_ratio".into(), sharpe),
        ])?)
    }
}

pub struct MetricsEngine {
    risk_free: f64,
}

impl MetricsEngine {
    pub fn new(risk_free: f64) -> Self {
        Self { risk_free }
    }

    /// Run the full pipeline over a cleaned price table.
    pub fn analyze(&self, prices: &DataFrame) -> Result<AnalysisReport> {
        log::info!(
            "Analyzing {} instruments over {} observations",
            prices.width(),
            prices.height()
        );

        let daily_returns = ReturnMetrics::daily(prices)?;
        let cumulative_returns = ReturnMetrics::cumulative(prices)?;
        let annualized_volatility = RiskMetrics::annualized_volatility(&daily_returns)?;
        let correlation = CorrelationMetrics::matrix(&daily_returns)?;
        let sharpe = RiskMetrics::sharpe_ratio(&daily_returns, &annualized_volatility, self.risk_free)?;

        Ok(AnalysisReport {
            daily_returns,
            cumulative_returns,
            annualized_volatility,
            correlation,
            sharpe,
        })
    }
}
