// src/engines/metrics/risk.rs
use super::{column_names, column_values, TRADING_DAYS_PER_YEAR};
use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Sample standard deviation of daily returns scaled to a one-year
    /// horizon. Fewer than two observations yield NaN for that instrument.
    pub fn annualized_volatility(returns: &DataFrame) -> Result<HashMap<String, f64>> {
        let mut volatility = HashMap::new();
        if returns.height() == 0 || returns.width() == 0 {
            return Ok(volatility);
        }

        for name in column_names(returns) {
            let values: Vec<f64> = column_values(returns, &name)?
                .into_iter()
                .flatten()
                .collect();
            volatility.insert(name, Self::sample_std(&values) * TRADING_DAYS_PER_YEAR.sqrt());
        }

        Ok(volatility)
    }

    /// Annualized excess return over annualized volatility. Zero volatility
    /// divides through as IEEE infinity/NaN; downstream rendering handles it.
    pub fn sharpe_ratio(
        returns: &DataFrame,
        annual_vol: &HashMap<String, f64>,
        risk_free: f64,
    ) -> Result<HashMap<String, f64>> {
        let mut sharpe = HashMap::new();
        if returns.height() == 0 || returns.width() == 0 || annual_vol.is_empty() {
            return Ok(sharpe);
        }

        for name in column_names(returns) {
            let vol = match annual_vol.get(&name) {
                Some(vol) => *vol,
                None => continue,
            };
            let values: Vec<f64> = column_values(returns, &name)?
                .into_iter()
                .flatten()
                .collect();
            if vol == 0.0 {
                log::warn!("Zero volatility for {}, Sharpe ratio is undefined", name);
            }
            let ratio = (Self::mean(&values) * TRADING_DAYS_PER_YEAR - risk_free) / vol;
            sharpe.insert(name, ratio);
        }

        Ok(sharpe)
    }

    fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn sample_std(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return f64::NAN;
        }
        let mean = Self::mean(values);
        let variance = values
            .iter()
            .map(|&v| (v - mean).powi(2))
            .sum::<f64>()
            / (values.len() - 1) as f64;
        variance.sqrt()
    }
}
