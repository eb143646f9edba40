use crate::error::{Result, StocklensError};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

pub struct DataValidator;

impl DataValidator {
    /// Validate that a DataFrame is usable as a price table: unique column
    /// names and numeric values in every column except the date column.
    pub fn validate_price_table(df: &DataFrame, date_column: Option<&str>) -> Result<()> {
        Self::validate_unique_columns(df)?;

        let mut price_columns = 0usize;
        for col_name in df.get_column_names() {
            if Some(col_name.as_str()) == date_column {
                continue;
            }
            let series = df.column(col_name)?.as_materialized_series();
            if !matches!(
                series.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(StocklensError::Validation(format!(
                    "Column '{}' must be numeric, found {:?}",
                    col_name,
                    series.dtype()
                )));
            }
            price_columns += 1;
        }

        if df.width() > 0 && price_columns == 0 {
            return Err(StocklensError::Validation(
                "No numeric price columns found".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_unique_columns(df: &DataFrame) -> Result<()> {
        let mut seen = HashSet::new();
        for col_name in df.get_column_names() {
            if !seen.insert(col_name.as_str()) {
                return Err(StocklensError::Validation(format!(
                    "Duplicate column name: {}",
                    col_name
                )));
            }
        }
        Ok(())
    }

    /// Check that the date column is strictly increasing, one row per period.
    pub fn validate_date_ordering(df: &DataFrame, column: &str) -> Result<()> {
        let series = df.column(column)?.as_materialized_series();

        if series.dtype() == &DataType::String {
            let ca = series.str()?;
            let mut prev: Option<NaiveDate> = None;
            for i in 0..ca.len() {
                let raw = ca.get(i).ok_or_else(|| {
                    StocklensError::Validation(format!("Null date at row {}", i))
                })?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                    StocklensError::Validation(format!(
                        "Unparseable date '{}' at row {}: {}",
                        raw, i, e
                    ))
                })?;
                if let Some(p) = prev {
                    if date <= p {
                        return Err(StocklensError::Validation(format!(
                            "Date column '{}' is not strictly increasing at row {}",
                            column, i
                        )));
                    }
                }
                prev = Some(date);
            }
            return Ok(());
        }

        // Date/Datetime/integer columns compare on their physical representation
        let cast = series.cast(&DataType::Int64)?;
        let ca = cast.i64()?;
        let mut prev: Option<i64> = None;
        for i in 0..ca.len() {
            let value = ca
                .get(i)
                .ok_or_else(|| StocklensError::Validation(format!("Null date at row {}", i)))?;
            if let Some(p) = prev {
                if value <= p {
                    return Err(StocklensError::Validation(format!(
                        "Date column '{}' is not strictly increasing at row {}",
                        column, i
                    )));
                }
            }
            prev = Some(value);
        }
        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(StocklensError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values per column
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?.as_materialized_series();
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}
