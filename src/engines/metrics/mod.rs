pub mod correlation;
pub mod engine;
pub mod returns;
pub mod risk;

pub use correlation::CorrelationMetrics;
pub use engine::{AnalysisReport, MetricsEngine};
pub use returns::ReturnMetrics;
pub use risk::RiskMetrics;

use crate::error::Result;
use polars::prelude::*;

/// Fixed annualization constant, one year of trading days.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Read one instrument column as f64 values, nulls preserved.
pub(crate) fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}
