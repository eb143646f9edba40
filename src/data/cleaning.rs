//! In-memory normalization of a loaded price table: blank-row drops,
//! forward fill, close-column selection and date-range filtering. The
//! metrics engine assumes all of this has already happened.

use crate::error::{Result, StocklensError};
use chrono::NaiveDate;
use polars::prelude::*;

const DATE_ALIASES: [&str; 6] = ["date", "Date", "datetime", "DateTime", "time", "timestamp"];

/// Find the date column by common aliases.
pub fn detect_date_column(df: &DataFrame) -> Option<String> {
    let columns = df.get_column_names();
    for alias in DATE_ALIASES {
        if columns.iter().any(|col| col.as_str() == alias) {
            return Some(alias.to_string());
        }
    }
    None
}

/// Drop all-blank rows, forward-fill gaps, then drop rows that are still
/// incomplete (leading gaps with nothing to fill from).
pub fn clean_prices(df: &DataFrame, date_column: Option<&str>) -> Result<DataFrame> {
    if df.height() == 0 || df.width() == 0 {
        return Ok(df.clone());
    }
    let df = drop_blank_rows(df, date_column)?;
    let filled = forward_fill(&df, date_column)?;
    if filled.height() < df.height() {
        log::debug!(
            "Dropped {} incomplete leading rows during cleaning",
            df.height() - filled.height()
        );
    }
    Ok(filled)
}

/// Drop rows where every price cell is null or NaN.
pub fn drop_blank_rows(df: &DataFrame, date_column: Option<&str>) -> Result<DataFrame> {
    let names = price_column_names(df, date_column);
    if names.is_empty() || df.height() == 0 {
        return Ok(df.clone());
    }

    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<_>>()?;

    let keep: Vec<bool> = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .any(|col| col[row].map_or(false, |v| !v.is_nan()))
        })
        .collect();

    filter_rows(df, &keep)
}

/// Carry the last observation forward per price column, then drop rows that
/// still have gaps.
pub fn forward_fill(df: &DataFrame, date_column: Option<&str>) -> Result<DataFrame> {
    let names = price_column_names(df, date_column);
    if names.is_empty() || df.height() == 0 {
        return Ok(df.clone());
    }

    let mut filled: Vec<Vec<Option<f64>>> = Vec::with_capacity(names.len());
    for name in &names {
        let values = column_values(df, name)?;
        let mut last: Option<f64> = None;
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            if let Some(v) = value {
                if !v.is_nan() {
                    last = Some(v);
                }
            }
            out.push(last);
        }
        filled.push(out);
    }

    let keep: Vec<bool> = (0..df.height())
        .map(|row| filled.iter().all(|col| col[row].is_some()))
        .collect();
    let mask = BooleanChunked::from_slice("mask".into(), &keep);

    let mut columns: Vec<Column> = Vec::with_capacity(df.width());
    for col_name in df.get_column_names() {
        if let Some(idx) = names.iter().position(|n| n == col_name.as_str()) {
            let values: Vec<f64> = filled[idx]
                .iter()
                .zip(&keep)
                .filter(|(_, &k)| k)
                .filter_map(|(v, _)| *v)
                .collect();
            columns.push(Column::new(col_name.clone(), values));
        } else {
            let series = df.column(col_name)?.as_materialized_series().filter(&mask)?;
            columns.push(series.into_column());
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// Keep only rows whose date falls inside the inclusive [start, end] window.
pub fn filter_date_range(
    df: &DataFrame,
    date_column: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DataFrame> {
    if start.is_none() && end.is_none() {
        return Ok(df.clone());
    }

    let series = df.column(date_column)?.as_materialized_series();
    let dates = date_values(series)?;

    let keep: Vec<bool> = dates
        .iter()
        .map(|date| match date {
            Some(d) => start.map_or(true, |s| *d >= s) && end.map_or(true, |e| *d <= e),
            None => false,
        })
        .collect();

    filter_rows(df, &keep)
}

/// Pick the close-price columns out of a wide OHLCV frame and rename them to
/// bare ticker symbols. Duplicate symbols keep the first occurrence.
pub fn select_close_columns(df: &DataFrame, tickers: &[String]) -> Result<DataFrame> {
    let candidates: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|col| col.as_str().contains("Close") || col.as_str().contains("AdjClose"))
        .map(|col| col.to_string())
        .collect();

    if candidates.is_empty() {
        return Err(StocklensError::DataLoading(
            "No close/adjusted close columns found in the data".to_string(),
        ));
    }

    let mut columns: Vec<Column> = Vec::new();
    let mut taken: Vec<String> = Vec::new();
    for candidate in &candidates {
        let upper = candidate.to_uppercase();
        let symbol = tickers
            .iter()
            .find(|ticker| upper.contains(&ticker.to_uppercase()))
            .cloned()
            .unwrap_or_else(|| candidate.clone());

        if taken.iter().any(|t| t == &symbol) {
            log::warn!("Duplicate column for symbol {}, keeping first", symbol);
            continue;
        }

        let series = df
            .column(candidate)?
            .as_materialized_series()
            .clone()
            .with_name(symbol.as_str().into());
        columns.push(series.into_column());
        taken.push(symbol);
    }

    Ok(DataFrame::new(columns)?)
}

/// Detach the date column so the remaining frame holds price columns only.
pub fn split_date_column(
    df: &DataFrame,
    date_column: Option<&str>,
) -> Result<(Option<Series>, DataFrame)> {
    let name = match date_column {
        Some(name) => Some(name.to_string()),
        None => detect_date_column(df),
    };

    match name {
        Some(name) if df.get_column_names().iter().any(|c| c.as_str() == name) => {
            let dates = df.column(&name)?.as_materialized_series().clone();
            let prices = df.drop(&name)?;
            Ok((Some(dates), prices))
        }
        _ => Ok((None, df.clone())),
    }
}

fn price_column_names(df: &DataFrame, date_column: Option<&str>) -> Vec<String> {
    df.get_column_names()
        .iter()
        .filter(|col| Some(col.as_str()) != date_column)
        .map(|col| col.to_string())
        .collect()
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(df.filter(&mask)?)
}

fn date_values(series: &Series) -> Result<Vec<Option<NaiveDate>>> {
    if series.dtype() == &DataType::String {
        let ca = series.str()?;
        let mut out = Vec::with_capacity(ca.len());
        for i in 0..ca.len() {
            match ca.get(i) {
                Some(raw) => {
                    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                        StocklensError::Validation(format!(
                            "Unparseable date '{}' at row {}: {}",
                            raw, i, e
                        ))
                    })?;
                    out.push(Some(date));
                }
                None => out.push(None),
            }
        }
        return Ok(out);
    }

    // Date/Datetime columns: go through days since the Unix epoch
    let cast = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    let ca = cast.i32()?;
    Ok(ca
        .into_iter()
        .map(|days| days.map(|d| NaiveDate::default() + chrono::Duration::days(d as i64)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_clean_prices_forward_fills_gaps() {
        let df = df! {
            "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
            "AAPL" => &[Some(100.0), None, Some(121.0)],
            "MSFT" => &[Some(200.0), Some(202.0), Some(199.0)],
        }
        .unwrap();

        let cleaned = clean_prices(&df, Some("date")).unwrap();
        assert_eq!(cleaned.height(), 3);

        let aapl = cleaned.column("AAPL").unwrap().as_materialized_series().f64().unwrap();
        assert_eq!(aapl.get(1), Some(100.0)); // filled from the previous row
    }

    #[test]
    fn test_clean_prices_drops_leading_gap() {
        let df = df! {
            "AAPL" => &[None, Some(110.0), Some(121.0)],
            "MSFT" => &[Some(200.0), Some(202.0), Some(199.0)],
        }
        .unwrap();

        let cleaned = clean_prices(&df, None).unwrap();
        assert_eq!(cleaned.height(), 2);
        let msft = cleaned.column("MSFT").unwrap().as_materialized_series().f64().unwrap();
        assert_eq!(msft.get(0), Some(202.0));
    }

    #[test]
    fn test_drop_blank_rows() {
        let df = df! {
            "AAPL" => &[Some(100.0), None, Some(121.0)],
            "MSFT" => &[Some(200.0), None, Some(199.0)],
        }
        .unwrap();

        let cleaned = drop_blank_rows(&df, None).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_select_close_columns_maps_tickers() {
        let df = df! {
            "AAPL_Close" => &[100.0, 110.0],
            "AAPL_Volume" => &[1000.0, 1200.0],
            "MSFT_Close" => &[200.0, 202.0],
        }
        .unwrap();

        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        let closes = select_close_columns(&df, &tickers).unwrap();
        assert_eq!(closes.width(), 2);
        let names: Vec<String> = closes
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, vec!["AAPL".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn test_select_close_columns_without_closes() {
        let df = df! {
            "AAPL_Open" => &[100.0, 110.0],
        }
        .unwrap();

        assert!(select_close_columns(&df, &[]).is_err());
    }

    #[test]
    fn test_filter_date_range() {
        let df = df! {
            "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
            "AAPL" => &[100.0, 110.0, 121.0],
        }
        .unwrap();

        let filtered = filter_date_range(
            &df,
            "date",
            NaiveDate::from_ymd_opt(2024, 1, 3),
            None,
        )
        .unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_split_date_column_detects_alias() {
        let df = df! {
            "Date" => &["2024-01-02", "2024-01-03"],
            "AAPL" => &[100.0, 110.0],
        }
        .unwrap();

        let (dates, prices) = split_date_column(&df, None).unwrap();
        assert!(dates.is_some());
        assert_eq!(prices.width(), 1);
    }
}
