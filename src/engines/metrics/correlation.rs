// src/engines/metrics/correlation.rs
use super::{column_names, column_values};
use crate::error::Result;
use polars::prelude::*;

pub struct CorrelationMetrics;

impl CorrelationMetrics {
    /// Pairwise Pearson correlation between every pair of instrument columns.
    /// Output is a square frame with a leading `ticker` column; symmetric by
    /// construction, diagonal exactly 1.0 for columns with nonzero variance.
    /// Constant columns correlate as NaN, which is left in place.
    pub fn matrix(returns: &DataFrame) -> Result<DataFrame> {
        if returns.height() == 0 || returns.width() == 0 {
            return Ok(DataFrame::empty());
        }

        let names = column_names(returns);
        let data: Vec<Vec<Option<f64>>> = names
            .iter()
            .map(|name| column_values(returns, name))
            .collect::<Result<_>>()?;

        let n = names.len();
        let mut matrix = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            matrix[i][i] = if Self::has_variance(&data[i]) {
                1.0
            } else {
                f64::NAN
            };
            for j in (i + 1)..n {
                let coefficient = Self::pearson(&data[i], &data[j]);
                matrix[i][j] = coefficient;
                matrix[j][i] = coefficient;
            }
        }

        let mut columns: Vec<Column> = Vec::with_capacity(n + 1);
        columns.push(Column::new("ticker".into(), names.clone()));
        for (j, name) in names.iter().enumerate() {
            let col: Vec<f64> = (0..n).map(|i| matrix[i][j]).collect();
            columns.push(Column::new(name.as_str().into(), col));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Pearson coefficient over rows where both series are observed.
    fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = a
            .iter()
            .zip(b)
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) => Some((*x, *y)),
                _ => None,
            })
            .collect();

        if pairs.len() < 2 {
            return f64::NAN;
        }

        let n = pairs.len() as f64;
        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        cov / (var_x.sqrt() * var_y.sqrt())
    }

    fn has_variance(values: &[Option<f64>]) -> bool {
        let observed: Vec<f64> = values.iter().flatten().copied().collect();
        observed.len() >= 2 && observed.iter().any(|v| *v != observed[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn cell(matrix: &DataFrame, row: usize, column: &str) -> f64 {
        matrix.column(column).unwrap().as_materialized_series().f64().unwrap().get(row).unwrap()
    }

    #[test]
    fn test_identical_series_correlate_fully() {
        let returns = df! {
            "A" => &[0.01, -0.02, 0.03],
            "B" => &[0.01, -0.02, 0.03],
        }
        .unwrap();

        let matrix = CorrelationMetrics::matrix(&returns).unwrap();
        assert!((cell(&matrix, 0, "B") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_series_correlate_negatively() {
        let returns = df! {
            "A" => &[0.01, -0.02, 0.03],
            "B" => &[-0.01, 0.02, -0.03],
        }
        .unwrap();

        let matrix = CorrelationMetrics::matrix(&returns).unwrap();
        assert!((cell(&matrix, 0, "B") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let returns = df! {
            "A" => &[0.011, -0.023, 0.017, 0.002],
            "B" => &[-0.004, 0.012, -0.009, 0.021],
            "C" => &[0.03, 0.01, -0.02, 0.005],
        }
        .unwrap();

        let matrix = CorrelationMetrics::matrix(&returns).unwrap();
        let names = ["A", "B", "C"];
        for (i, name_i) in names.iter().enumerate() {
            assert_eq!(cell(&matrix, i, name_i), 1.0);
            for (j, name_j) in names.iter().enumerate() {
                assert_eq!(cell(&matrix, i, name_j), cell(&matrix, j, name_i));
            }
        }
    }

    #[test]
    fn test_constant_column_yields_nan() {
        let returns = df! {
            "A" => &[0.01, -0.02, 0.03],
            "B" => &[0.1, 0.1, 0.1],
        }
        .unwrap();

        let matrix = CorrelationMetrics::matrix(&returns).unwrap();
        assert!(cell(&matrix, 0, "B").is_nan());
        assert!(cell(&matrix, 1, "B").is_nan()); // own diagonal too
        assert_eq!(cell(&matrix, 0, "A"), 1.0);
    }

    #[test]
    fn test_empty_input() {
        let matrix = CorrelationMetrics::matrix(&DataFrame::empty()).unwrap();
        assert_eq!(matrix.height(), 0);
        assert_eq!(matrix.width(), 0);
    }
}
