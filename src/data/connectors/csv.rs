use super::validator::DataValidator;
use crate::error::{Result, StocklensError};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| StocklensError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load and validate a CSV price table. The date column is detected from
    /// common aliases when not named explicitly.
    pub fn load_and_validate<P: AsRef<Path>>(
        path: P,
        date_column: Option<&str>,
        min_rows: Option<usize>,
    ) -> Result<DataFrame> {
        let df = Self::load(&path)?;

        let date_column = date_column
            .map(str::to_string)
            .or_else(|| crate::data::cleaning::detect_date_column(&df));
        DataValidator::validate_price_table(&df, date_column.as_deref())?;

        let min_rows = min_rows.unwrap_or(2);
        DataValidator::validate_minimum_rows(&df, min_rows)?;

        if let Some(column) = &date_column {
            DataValidator::validate_date_ordering(&df, column)?;
        }

        // Warn about nulls but don't fail; cleaning handles them
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Write a DataFrame back out as CSV
    pub fn save<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
        let mut file = std::fs::File::create(path.as_ref())?;
        let mut out = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut out)
            .map_err(|e| StocklensError::DataLoading(format!("Failed to write CSV: {}", e)))?;
        Ok(())
    }
}
