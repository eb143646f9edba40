use chrono::NaiveDate;
use polars::df;
use stocklens::config::AppConfig;
use stocklens::data::cleaning;
use stocklens::data::CsvConnector;
use stocklens::engines::metrics::MetricsEngine;
use stocklens::report::Insights;

#[test]
fn test_full_analysis_pipeline() {
    // Wide yfinance-style export with a gap in one close column
    let raw = df! {
        "Date" => &["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
        "AAPL_Close" => &[Some(100.0), Some(110.0), None, Some(121.0)],
        "AAPL_Volume" => &[1000.0, 1100.0, 900.0, 1200.0],
        "MSFT_Close" => &[Some(200.0), Some(202.0), Some(199.0), Some(205.0)],
    }
    .unwrap();

    let cleaned = cleaning::clean_prices(&raw, Some("Date")).unwrap();
    assert_eq!(cleaned.height(), 4); // gap is forward-filled, not dropped

    let (dates, prices) = cleaning::split_date_column(&cleaned, None).unwrap();
    assert!(dates.is_some());

    let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
    let closes = cleaning::select_close_columns(&prices, &tickers).unwrap();
    assert_eq!(closes.width(), 2);

    let engine = MetricsEngine::new(0.0);
    let report = engine.analyze(&closes).unwrap();

    assert_eq!(report.daily_returns.height(), 3);
    assert_eq!(report.cumulative_returns.height(), 4);
    assert_eq!(report.correlation.height(), 2);
    assert_eq!(report.annualized_volatility.len(), 2);
    assert_eq!(report.sharpe.len(), 2);

    let insights = Insights::from_report(&report).unwrap();
    assert!(insights.best_performer.is_some());
    assert!(insights.average_correlation.is_some());
}

#[test]
fn test_pipeline_with_date_filter() {
    let raw = df! {
        "date" => &["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
        "AAPL" => &[100.0, 110.0, 115.0, 121.0],
    }
    .unwrap();

    let filtered = cleaning::filter_date_range(
        &raw,
        "date",
        NaiveDate::from_ymd_opt(2024, 1, 3),
        NaiveDate::from_ymd_opt(2024, 1, 4),
    )
    .unwrap();
    assert_eq!(filtered.height(), 2);

    let (_, prices) = cleaning::split_date_column(&filtered, Some("date")).unwrap();
    let report = MetricsEngine::new(0.0).analyze(&prices).unwrap();
    assert_eq!(report.daily_returns.height(), 1);
}

#[test]
fn test_csv_roundtrip_through_engine() {
    let df = df! {
        "date" => &["2024-01-02", "2024-01-03", "2024-01-04"],
        "AAPL" => &[100.0, 110.0, 121.0],
        "MSFT" => &[200.0, 202.0, 199.0],
    }
    .unwrap();

    let path = std::env::temp_dir().join("stocklens_pipeline_prices.csv");
    CsvConnector::save(&df, &path).unwrap();

    let loaded = CsvConnector::load_and_validate(&path, Some("date"), Some(2)).unwrap();
    let (_, prices) = cleaning::split_date_column(&loaded, Some("date")).unwrap();
    let report = MetricsEngine::new(0.0).analyze(&prices).unwrap();

    assert_eq!(report.daily_returns.height(), 2);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_defaults_are_usable() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.analysis.risk_free_rate, 0.0);
    assert!(config.analysis.tickers.is_empty());
}
