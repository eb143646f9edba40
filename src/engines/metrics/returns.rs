// src/engines/metrics/returns.rs
use super::{column_names, column_values};
use crate::error::Result;
use polars::prelude::*;

pub struct ReturnMetrics;

impl ReturnMetrics {
    /// Period-over-period fractional change per instrument. The first row has
    /// no prior period and is dropped; any row containing a non-finite value
    /// (division by a zero price, missing observation) is dropped whole.
    pub fn daily(prices: &DataFrame) -> Result<DataFrame> {
        if prices.height() == 0 || prices.width() == 0 {
            return Ok(prices.clear());
        }

        let names = column_names(prices);
        let mut per_column: Vec<Vec<Option<f64>>> = Vec::with_capacity(names.len());
        for name in &names {
            let values = column_values(prices, name)?;
            let mut returns = Vec::with_capacity(values.len().saturating_sub(1));
            for window in values.windows(2) {
                let ret = match (window[0], window[1]) {
                    (Some(prev), Some(cur)) => {
                        let r = cur / prev - 1.0;
                        if r.is_finite() {
                            Some(r)
                        } else {
                            None
                        }
                    }
                    _ => None,
                };
                returns.push(ret);
            }
            per_column.push(returns);
        }

        let total_rows = prices.height() - 1;
        let keep: Vec<bool> = (0..total_rows)
            .map(|row| per_column.iter().all(|col| col[row].is_some()))
            .collect();
        let dropped = keep.iter().filter(|&&k| !k).count();
        if dropped > 0 {
            log::warn!("Dropped {} return rows with non-finite values", dropped);
        }

        let columns: Vec<Column> = names
            .iter()
            .zip(&per_column)
            .map(|(name, values)| {
                let kept: Vec<f64> = values
                    .iter()
                    .zip(&keep)
                    .filter(|(_, &k)| k)
                    .filter_map(|(v, _)| *v)
                    .collect();
                Column::new(name.as_str().into(), kept)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Fractional change of every row relative to the first observation.
    /// Row 0 is included and is exactly zero whenever the base is nonzero.
    pub fn cumulative(prices: &DataFrame) -> Result<DataFrame> {
        if prices.height() == 0 || prices.width() == 0 {
            return Ok(prices.clone());
        }

        let names = column_names(prices);
        let mut columns: Vec<Column> = Vec::with_capacity(names.len());
        for name in &names {
            let values = column_values(prices, name)?;
            let base = values[0];
            let cumulative: Vec<Option<f64>> = values
                .iter()
                .map(|value| match (base, value) {
                    (Some(b), Some(v)) => Some(v / b - 1.0),
                    _ => None,
                })
                .collect();
            columns.push(Column::new(name.as_str().into(), cumulative));
        }

        Ok(DataFrame::new(columns)?)
    }
}
